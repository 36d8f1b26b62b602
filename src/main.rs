use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use elenkhos::{
    AssemblyAiConfig, DebateAnalyzer, Fingerprint, JsonStore, OpenAiClient, OpenAiConfig,
    Transcriber,
};

#[derive(Parser)]
#[command(name = "elenkhos")]
#[command(author, version, about = "Debate argument-graph analysis pipeline", long_about = None)]
struct Cli {
    /// Path to the audio file to analyze
    audio_file: PathBuf,

    /// Output file for the analysis artifact (JSON)
    #[arg(short, long, default_value = "debate_analysis.json")]
    output: PathBuf,

    /// Directory holding the transcription and analysis caches
    #[arg(long, default_value = ".")]
    cache_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    info!("starting analysis process for {}", cli.audio_file.display());
    run(cli).await
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<()> {
    if !cli.audio_file.exists() {
        anyhow::bail!("audio file not found: {}", cli.audio_file.display());
    }

    let fingerprint =
        Fingerprint::for_file(&cli.audio_file).context("Failed to fingerprint input file")?;

    let transcription_store = JsonStore::transcription_cache(&cli.cache_dir);
    let analysis_store = JsonStore::analysis_cache(&cli.cache_dir);

    let transcriber = Transcriber::new(AssemblyAiConfig::from_env()?);
    let transcript = transcriber
        .transcribe_with_cache(&transcription_store, &cli.audio_file, &fingerprint)
        .await
        .context("Transcription failed")?;

    let gateway = OpenAiClient::new(OpenAiConfig::from_env()?);
    let mut analyzer = DebateAnalyzer::new();
    analyzer
        .analyze_transcript(&gateway, &transcript, &fingerprint, &analysis_store)
        .await
        .context("Analysis failed")?;

    print_report(&transcript, &analyzer)?;

    let analysis = analyzer.to_analysis();
    let artifact = serde_json::to_string_pretty(&analysis)?;
    std::fs::write(&cli.output, artifact)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!(
        "\nAnalysis complete. Results saved to {}",
        cli.output.display()
    );
    Ok(())
}

/// Print the console report.
///
/// Cached analyses are loaded verbatim, so link endpoints are re-checked
/// here: a hand-edited or legacy record must surface an integrity error,
/// not a panic.
fn print_report(transcript: &elenkhos::Transcript, analyzer: &DebateAnalyzer) -> Result<()> {
    println!("Transcript Summary:");
    if let Some(duration) = transcript.audio_duration {
        println!("Total duration: {} seconds", duration);
    }
    println!("Number of speakers: {}", transcript.speaker_count());
    println!("---");

    println!("Analyzed Arguments:");
    for arg in &analyzer.arguments {
        println!("Speaker {}:", arg.speaker);
        println!("Argument: {}", arg.text);
        println!("Scheme: {}", arg.scheme);
        println!("Premises: {}", arg.premises.join(", "));
        println!("Conclusion: {}", arg.conclusion);
        println!("Critical Questions:");
        for question in &arg.critical_questions {
            println!("- {}", question);
        }
        println!("---");
    }

    println!("Argument Relations:");
    for link in &analyzer.graph.links {
        let (Some(source), Some(target)) = (
            analyzer.arguments.get(link.source),
            analyzer.arguments.get(link.target),
        ) else {
            return Err(elenkhos::AnalysisError::Integrity(format!(
                "cached relation {} -> {} references a missing argument ({} present)",
                link.source,
                link.target,
                analyzer.arguments.len()
            ))
            .into());
        };
        println!(
            "Argument {} ({}) {}s Argument {} ({})",
            link.source, source.speaker, link.relation_type, link.target, target.speaker
        );
    }
    Ok(())
}
