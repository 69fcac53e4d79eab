use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use causerie::voice::{AudioCapture, AudioPlayback, Microphone, Speaker};
use causerie::{ChatWidget, Config, HttpEndpoint, Sender};

/// Causerie - voice-enabled chat widget client
#[derive(Parser)]
#[command(name = "causerie", version, about)]
struct Cli {
    /// Message endpoint base URL (overrides config file)
    #[arg(short, long, env = "CAUSERIE_ENDPOINT")]
    endpoint: Option<String>,

    /// Path to an alternative config file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (for hosts without audio hardware)
    #[arg(long, env = "CAUSERIE_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Bonjour ! Ceci est un test de la synthèse vocale.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,causerie=info",
        1 => "info,causerie=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint_url = endpoint;
    }
    if cli.disable_voice {
        config.voice.enabled = false;
    }

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&config, &text).await,
        };
    }

    run_chat(config).await
}

/// Run the interactive chat loop
async fn run_chat(config: Config) -> anyhow::Result<()> {
    tracing::info!(endpoint = %config.endpoint_url, "starting chat widget");

    let endpoint = HttpEndpoint::new(&config.endpoint_url);

    let recognizer: Option<Box<dyn causerie::SpeechRecognizer>> = if config.voice.enabled {
        match Microphone::from_config(&config) {
            Ok(mic) => Some(Box::new(mic)),
            Err(e) => {
                tracing::warn!(error = %e, "speech recognition unavailable");
                None
            }
        }
    } else {
        None
    };

    let synthesizer: Option<Box<dyn causerie::SpeechSynthesizer>> = if config.voice.enabled {
        match Speaker::from_config(&config) {
            Ok(speaker) => Some(Box::new(speaker)),
            Err(e) => {
                tracing::warn!(error = %e, "speech synthesis unavailable");
                None
            }
        }
    } else {
        None
    };

    let mut widget = ChatWidget::new(Box::new(endpoint), recognizer, synthesizer);

    println!("causerie - tapez un message, /mic pour parler, /quit pour sortir");
    println!("[{}]", widget.controls().status);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut printed = 0;

    stdout.write_all(b"vous> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/mic" => {
                println!("[{}]", causerie::widget::status::LISTENING);
                widget.press_microphone().await;
            }
            _ => {
                widget.set_input(&line);
                widget.submit().await;
            }
        }

        // Print everything appended since the last turn
        for entry in &widget.transcript().entries()[printed..] {
            match entry.message.sender {
                Sender::User => println!("vous> {}", entry.message.text),
                Sender::Bot => println!("bot>  {}", entry.message.text),
            }
        }
        printed = widget.transcript().len();

        println!("[{}]", widget.controls().status);
        stdout.write_all(b"vous> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Test microphone input with a level meter
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Test du micro pendant {duration} secondes, parlez !");
    println!("---");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{:2}s] RMS: {energy:.4} | Peak: {peak:.4} | [{meter}]", i + 1);
        capture.clear_buffer();
    }

    capture.stop();
    println!("---");
    println!("Si le niveau a bougé, le micro fonctionne.");
    Ok(())
}

/// RMS energy
#[allow(clippy::cast_precision_loss)]
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Test du haut-parleur : un la (440 Hz) pendant 2 secondes");

    let mut playback = AudioPlayback::new()?;

    let sample_rate = 24000_f32;
    let frequency = 440.0_f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_samples = (sample_rate * 2.0) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3
        })
        .collect();

    playback.play(samples).await?;

    println!("---");
    println!("Si vous avez entendu le son, le haut-parleur fonctionne.");
    Ok(())
}

/// Test TTS output end to end
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Test de la synthèse vocale : \"{text}\"");

    let mut speaker = Speaker::from_config(config)?;
    causerie::SpeechSynthesizer::speak(&mut speaker, text).await?;

    println!("---");
    println!("Si vous avez entendu la phrase, la synthèse fonctionne.");
    Ok(())
}
