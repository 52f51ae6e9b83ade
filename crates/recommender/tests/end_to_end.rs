//! Preprocess raw tables, persist the artifacts, load them back and serve.

use std::fs;
use std::sync::Arc;

use catalog::{Catalog, Normalizer};
use predictor::{ModelArtifacts, Vocabulary};
use recommender::{RecommendError, RecommendationService, RecommenderConfig, ScorerKind};
use tempfile::{TempDir, tempdir};

const MOVIES_CSV: &str = "\
movieId,title,genres
1,Scream (1996),Horror
2,Heat (1995),Action|Crime|Thriller
3,Toy Story (1995),Animation|Children|Comedy
4,Alien (1979),Horror|Sci-Fi
5,Jaws (1975),Thriller
";

const RATINGS_CSV: &str = "\
userId,movieId,rating,timestamp
1,1,4.0,964982703
2,1,4.0,964981247
1,2,3.0,964982224
1,3,4.5,964983815
1,4,4.5,964982931
3,5,3.5,964982400
";

/// Fear gets weight 4, everything else 0, plus a bias of 0.25.
/// Vocabulary order is [Anger, Disgust, Fear, Joy].
const MODEL_JSON: &str = r#"{
  "layers": [
    {"type": "dense", "weights": [[0.0, 0.0, 4.0, 0.0]], "bias": [0.25], "activation": "linear"}
  ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Run the offline steps: preprocess, save the catalog, fit the vocabulary
    fn prepare() -> Self {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("raw");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("movie.csv"), MOVIES_CSV).unwrap();
        fs::write(raw.join("rating.csv"), RATINGS_CSV).unwrap();

        let (catalog, report) = Catalog::from_raw_files(
            &raw.join("movie.csv"),
            &raw.join("rating.csv"),
            &Normalizer::default(),
        )
        .unwrap();
        assert_eq!(report.movies_filled, 0);
        catalog
            .save(&dir.path().join("processed/processed_movies.csv"))
            .unwrap();

        let vocabulary = Vocabulary::fit(catalog.emotion_sets());
        vocabulary
            .save(&dir.path().join("models/vocabulary.json"))
            .unwrap();
        fs::write(dir.path().join("models/model.json"), MODEL_JSON).unwrap();

        Self { dir }
    }

    fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }

    fn catalog(&self) -> Arc<Catalog> {
        Arc::new(Catalog::load(&self.path("processed/processed_movies.csv")).unwrap())
    }

    fn model(&self) -> ModelArtifacts {
        ModelArtifacts::load(
            &self.path("models/model.json"),
            &self.path("models/vocabulary.json"),
        )
        .unwrap()
    }

    fn service(&self, scorer: ScorerKind) -> RecommendationService {
        let config = RecommenderConfig {
            scorer,
            ..Default::default()
        };
        RecommendationService::new(self.catalog(), config, Some(self.model())).unwrap()
    }
}

fn ids(service: &RecommendationService, emotions: &[&str]) -> Vec<u32> {
    service
        .recommend(emotions)
        .unwrap()
        .recommendations
        .iter()
        .map(|r| r.movie_id)
        .collect()
}

#[test]
fn test_vocabulary_is_sorted_union() {
    let ws = Workspace::prepare();
    let vocabulary = Vocabulary::load(&ws.path("models/vocabulary.json")).unwrap();
    assert_eq!(vocabulary.labels(), ["Anger", "Disgust", "Fear", "Joy"]);
}

#[test]
fn test_fear_by_predicted_rating() {
    let ws = Workspace::prepare();
    let service = ws.service(ScorerKind::Rating);

    let response = service.recommend(&["Fear"]).unwrap();
    assert_eq!(response.predicted_rating, Some(4.25));
    assert_eq!(response.emotions, vec!["Fear"]);

    // Alien and Scream tie at 0.25; the higher rated comes first.
    // Toy Story has no Fear and is filtered out.
    let ids: Vec<u32> = response.recommendations.iter().map(|r| r.movie_id).collect();
    assert_eq!(ids, vec![4, 1, 5, 2]);

    let ranks: Vec<usize> = response.recommendations.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);

    let alien = &response.recommendations[0];
    assert_eq!(alien.title, "Alien (1979)");
    assert_eq!(alien.distance, 0.25);
    assert_eq!(alien.stars, "★★★★☆");
    assert_eq!(alien.info, "Average Rating: 4.5 | Genres: Horror|Sci-Fi");
    assert_eq!(
        alien.search_url,
        "https://www.google.com/search?q=Alien%20%281979%29"
    );
}

#[test]
fn test_fear_by_similarity() {
    let ws = Workspace::prepare();
    let service = ws.service(ScorerKind::Similarity);

    let response = service.recommend(&["Fear"]).unwrap();
    assert_eq!(response.predicted_rating, None);
    let ids: Vec<u32> = response.recommendations.iter().map(|r| r.movie_id).collect();
    assert_eq!(ids, vec![4, 1, 5, 2]);
    assert!(response.recommendations[3].distance > response.recommendations[0].distance);
}

#[test]
fn test_repeated_requests_agree() {
    let ws = Workspace::prepare();
    let service = ws.service(ScorerKind::Rating);
    assert_eq!(
        service.recommend(&["Fear", "Joy"]).unwrap(),
        service.recommend(&["Fear", "Joy"]).unwrap()
    );
}

#[test]
fn test_top_n_truncates() {
    let ws = Workspace::prepare();
    let config = RecommenderConfig {
        top_n: 2,
        ..Default::default()
    };
    let service = RecommendationService::new(ws.catalog(), config, Some(ws.model())).unwrap();
    assert_eq!(ids(&service, &["Fear"]), vec![4, 1]);
}

#[test]
fn test_without_emotion_match_ranks_whole_catalog() {
    let ws = Workspace::prepare();
    let config = RecommenderConfig {
        require_emotion_match: false,
        ..Default::default()
    };
    let service = RecommendationService::new(ws.catalog(), config, Some(ws.model())).unwrap();
    // Toy Story (4.5) now ties with Alien at 0.25; id breaks the tie.
    assert_eq!(ids(&service, &["Fear"]), vec![3, 4, 1, 5, 2]);
}

#[test]
fn test_request_errors() {
    let ws = Workspace::prepare();
    let service = ws.service(ScorerKind::Rating);

    assert!(matches!(
        service.recommend::<&str>(&[]),
        Err(RecommendError::EmptySelection)
    ));
    assert!(matches!(
        service.recommend(&["Joy", "Fear", "Anger"]),
        Err(RecommendError::TooManySelections { count: 3, .. })
    ));
    match service.recommend(&["Sadness"]) {
        Err(RecommendError::UnknownEmotion(label)) => assert_eq!(label, "Sadness"),
        other => panic!("expected UnknownEmotion, got {:?}", other),
    }
}

#[test]
fn test_missing_model_artifact() {
    let ws = Workspace::prepare();
    let missing = ModelArtifacts::load(
        &ws.path("models/absent.json"),
        &ws.path("models/vocabulary.json"),
    );
    assert!(missing.is_err());
}
