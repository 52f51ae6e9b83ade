use anyhow::{Context, Result};
use catalog::{Catalog, Emotion, NormalizeReport, Normalizer};
use clap::{Parser, Subcommand};
use colored::Colorize;
use predictor::{ModelArtifacts, Vocabulary};
use recommender::{
    RecommendationResponse, RecommendationService, RecommenderConfig, ScorerKind,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const SEARCH_LIMIT: usize = 20;

/// Emotion-based movie recommender
#[derive(Parser)]
#[command(name = "emotion-recs")]
#[command(about = "Recommend movies that match how you feel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the processed catalog from the raw MovieLens tables
    Preprocess {
        #[arg(long, default_value = "data/raw/movie.csv")]
        movies: PathBuf,

        #[arg(long, default_value = "data/raw/rating.csv")]
        ratings: PathBuf,

        #[arg(long, default_value = "data/processed/processed_movies.csv")]
        output: PathBuf,
    },

    /// Fit the emotion vocabulary on a processed catalog
    FitVocabulary {
        #[arg(long, default_value = "data/processed/processed_movies.csv")]
        catalog: PathBuf,

        #[arg(long, default_value = "models/vocabulary.json")]
        output: PathBuf,
    },

    /// Recommend movies for one or two emotions
    Recommend {
        #[arg(long, default_value = "data/processed/processed_movies.csv")]
        catalog: PathBuf,

        /// Emotion to match (repeat for a second one)
        #[arg(long = "emotion", required = true)]
        emotions: Vec<Emotion>,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// rating | similarity
        #[arg(long)]
        scorer: Option<ScorerKind>,

        #[arg(long, default_value = "models/model.json")]
        model: PathBuf,

        #[arg(long, default_value = "models/vocabulary.json")]
        vocabulary: PathBuf,

        /// Rank every movie, not only those carrying a selected emotion
        #[arg(long)]
        any_movie: bool,

        /// JSON file with recommender settings; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        #[arg(long, default_value = "data/processed/processed_movies.csv")]
        catalog: PathBuf,

        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,
    },

    /// List the selectable emotions
    Emotions,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preprocess {
            movies,
            ratings,
            output,
        } => handle_preprocess(&movies, &ratings, &output)?,
        Commands::FitVocabulary { catalog, output } => handle_fit_vocabulary(&catalog, &output)?,
        Commands::Recommend {
            catalog,
            emotions,
            limit,
            scorer,
            model,
            vocabulary,
            any_movie,
            config,
            json,
        } => {
            let mut settings = match config {
                Some(path) => RecommenderConfig::from_file(&path)
                    .context("Failed to load recommender config")?,
                None => RecommenderConfig::default(),
            };
            if let Some(limit) = limit {
                settings.top_n = limit;
            }
            if let Some(scorer) = scorer {
                settings.scorer = scorer;
            }
            if any_movie {
                settings.require_emotion_match = false;
            }
            handle_recommend(&catalog, &emotions, settings, &model, &vocabulary, json)?
        }
        Commands::Search { catalog, title } => handle_search(&catalog, &title)?,
        Commands::Emotions => handle_emotions(),
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let start = Instant::now();
    let catalog = Catalog::load(path)
        .with_context(|| format!("Failed to load catalog from {}", path.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(catalog)
}

/// Handle the 'preprocess' command
fn handle_preprocess(movies: &Path, ratings: &Path, output: &Path) -> Result<()> {
    let normalizer = Normalizer::default();
    println!(
        "Building catalog from {} and {} (table {})...",
        movies.display(),
        ratings.display(),
        normalizer.table().version()
    );

    let (catalog, report) = Catalog::from_raw_files(movies, ratings, &normalizer)
        .context("Failed to read the raw MovieLens tables")?;
    catalog
        .save(output)
        .with_context(|| format!("Failed to write catalog to {}", output.display()))?;

    info!(
        "Catalog built with table {}: {} movies, global mean {:.3}",
        normalizer.table().version(),
        catalog.len(),
        report.global_mean
    );
    print_report(&report);
    println!(
        "{} Wrote {} movies to {}",
        "✓".green(),
        catalog.len(),
        output.display()
    );
    Ok(())
}

fn print_report(report: &NormalizeReport) {
    println!("{}", "Verification summary:".bold().blue());
    println!("{}Movies read: {}", "• ".green(), report.movies_read);
    println!(
        "{}Dropped: {} missing fields, {} without genres, {} duplicates",
        "• ".green(),
        report.movies_missing_fields,
        report.movies_without_genres,
        report.duplicate_movies
    );
    println!("{}Ratings read: {}", "• ".cyan(), report.ratings_read);
    println!(
        "{}Dropped: {} invalid, {} duplicates",
        "• ".cyan(),
        report.ratings_invalid,
        report.duplicate_ratings
    );
    println!(
        "{}Movies filled with the global mean ({:.3}): {}",
        "• ".cyan(),
        report.global_mean,
        report.movies_filled
    );
}

/// Handle the 'fit-vocabulary' command
fn handle_fit_vocabulary(catalog_path: &Path, output: &Path) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let vocabulary = Vocabulary::fit(catalog.emotion_sets());
    vocabulary
        .save(output)
        .with_context(|| format!("Failed to write vocabulary to {}", output.display()))?;

    println!(
        "{} Vocabulary [{}] written to {}",
        "✓".green(),
        vocabulary.labels().join(", "),
        output.display()
    );
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog_path: &Path,
    emotions: &[Emotion],
    config: RecommenderConfig,
    model_path: &Path,
    vocabulary_path: &Path,
    json: bool,
) -> Result<()> {
    let catalog = Arc::new(load_catalog(catalog_path)?);

    let model = match config.scorer {
        ScorerKind::Rating => Some(
            ModelArtifacts::load(model_path, vocabulary_path)
                .context("Failed to load the rating model")?,
        ),
        ScorerKind::Similarity => None,
    };

    info!(
        "Serving {} recommendations with the {} scorer",
        config.top_n, config.scorer
    );
    let service = RecommendationService::new(catalog, config, model)?;
    let labels: Vec<&str> = emotions.iter().map(Emotion::as_str).collect();
    let response = service.recommend(labels.as_slice())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_recommendations(&response, emotions);
    }
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(response: &RecommendationResponse, emotions: &[Emotion]) {
    let mood = emotions
        .iter()
        .map(|e| format!("{} {}", e.emoji(), e))
        .collect::<Vec<_>>()
        .join(" + ");
    println!("{}", format!("Recommendations for {}:", mood).bold().blue());

    if let Some(rating) = response.predicted_rating {
        println!("Predicted rating: {:.2}", rating);
    }

    if response.is_empty() {
        println!("{}", "No movies found".yellow());
        return;
    }

    for rec in &response.recommendations {
        println!(
            "{}. {} {}",
            rec.rank.to_string().green(),
            rec.title.bold(),
            rec.stars.yellow()
        );
        println!("   {}", rec.info);
        println!("   Emotions: {}", rec.emotions.join(", "));
        println!("   {}", rec.search_url.dimmed());
    }
}

/// Handle the 'search' command
fn handle_search(catalog_path: &Path, title: &str) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let matches = catalog.search_title(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("{}", "No movies found".yellow());
        return Ok(());
    }
    for movie in matches.iter().take(SEARCH_LIMIT) {
        println!(
            "{}: {} [{}] avg {:.2} ({})",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            movie.average_rating,
            movie.emotions.join(", ")
        );
    }
    Ok(())
}

/// Handle the 'emotions' command
fn handle_emotions() {
    println!("{}", "Select one or two emotions:".bold().blue());
    for emotion in Emotion::ALL {
        println!("{}{} {}", "• ".green(), emotion.emoji(), emotion);
    }
}
