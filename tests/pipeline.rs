//! End-to-end runs against an in-memory catalog.

use novita::models::{
    CategoryLabel, Config, CrawlerConfig, Description, DescriptionStatus, Seed, TIMEOUT_DESCRIPTION,
};
use novita::pipeline::{RunOptions, run_pipeline, run_scraper};
use novita::render::MemoryRenderer;
use novita::storage::{LocalStorage, RecordSink};

const HISTORY: &str = "https://www.ibs.it/libri/ultima-settimana?filterDepartment=Storia";
const PHILOSOPHY: &str = "https://www.ibs.it/libri/ultima-settimana?filterDepartment=Filosofia";

fn card(title: &str, author: &str, publisher: &str, href: &str) -> String {
    format!(
        r#"<div class="cc-product-list-item">
             <div class="cc-col-img"><img data-src="https://img.ibs.it/{href}.jpg"></div>
             <a class="title" href="/{href}">{title}</a>
             <div class="cc-author">di {author}</div>
             <div class="cc-publisher">{publisher}, 2024</div>
           </div>"#
    )
}

fn listing(cards: &[String]) -> String {
    format!(
        "<html><body><button id=\"onetrust-accept-btn-handler\">OK</button>{}</body></html>",
        cards.concat()
    )
}

fn detail(synopsis: &str) -> String {
    format!(
        r#"<html><body><h1>Titolo</h1>
           <div class="cc-em-content-body"><div class="cc-content-text">Titolo<br>{synopsis}</div></div>
           </body></html>"#
    )
}

fn page(url: &str, n: u32) -> String {
    Seed::new("any", url).page_url("page", n).unwrap()
}

fn config() -> Config {
    Config {
        seeds: vec![Seed::new("Storia", HISTORY), Seed::new("Filosofia", PHILOSOPHY)],
        publishers: vec!["Laterza".to_string(), "Einaudi".to_string()],
        crawler: CrawlerConfig::immediate(),
        ..Config::default()
    }
}

fn catalog() -> MemoryRenderer {
    MemoryRenderer::new()
        .with_page(
            HISTORY,
            listing(&[
                card("Storia d'Italia", "M. Rossi", "Laterza", "storia"),
                card("Piccolo saggio", "L. Bianchi", "Edizioni Minori", "saggio"),
            ]),
        )
        .with_page(page(HISTORY, 2), listing(&[]))
        .with_page(
            PHILOSOPHY,
            listing(&[
                card("storia d'italia", "m. rossi", "Adelphi", "storia-bis"),
                card("Il tempo", "G. Verdi", "Einaudi", "tempo"),
            ]),
        )
        .with_page(page(PHILOSOPHY, 2), listing(&[]))
        .with_page("https://www.ibs.it/storia", detail("Dalle origini a oggi."))
        .with_stalled("https://www.ibs.it/tempo")
}

#[tokio::test]
async fn test_run_deduplicates_and_enriches_priority_only() {
    let renderer = catalog();
    let (registry, outcome) = run_scraper(&config(), &renderer, RunOptions::default())
        .await
        .unwrap();

    let titles: Vec<&str> = registry.all().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Storia d'Italia", "Piccolo saggio", "Il tempo"]);

    let history = &registry.all()[0];
    assert_eq!(history.publisher, "Laterza");
    assert_eq!(history.author, "M. Rossi");
    assert_eq!(history.category_label, CategoryLabel::Priority);
    assert_eq!(
        history.description,
        Description::Fetched("Dalle origini a oggi.".to_string())
    );

    let essay = &registry.all()[1];
    assert_eq!(essay.category_label, CategoryLabel::Other);
    assert_eq!(essay.description, Description::NotAttempted);

    let time = &registry.all()[2];
    assert_eq!(time.description, Description::Timeout);
    assert_eq!(time.description.text(), TIMEOUT_DESCRIPTION);

    assert_eq!(outcome.seeds, 2);
    assert_eq!(outcome.pages, 2);
    assert_eq!(outcome.cards, 4);
    assert_eq!(outcome.unique, 3);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.priority, 2);
    assert_eq!(outcome.enriched, 1);
    assert_eq!(outcome.timeouts, 1);

    let visited = renderer.navigations().await;
    assert!(!visited.contains(&"https://www.ibs.it/saggio".to_string()));
    assert!(!visited.contains(&"https://www.ibs.it/storia-bis".to_string()));
    assert!(renderer.is_closed());
}

#[tokio::test]
async fn test_skip_enrichment_leaves_descriptions_untouched() {
    let renderer = catalog();
    let options = RunOptions {
        skip_enrichment: true,
    };
    let (registry, outcome) = run_scraper(&config(), &renderer, options).await.unwrap();

    assert_eq!(registry.len(), 3);
    assert!(
        registry
            .all()
            .iter()
            .all(|r| r.description == Description::NotAttempted)
    );
    assert_eq!(outcome.enriched, 0);
    assert_eq!(renderer.navigations().await.len(), 4);
    assert!(renderer.is_closed());
}

#[tokio::test]
async fn test_pipeline_exports_all_and_priority_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = config();
    let storage = LocalStorage::with_root(dir.path(), &config.output);

    run_pipeline(&config, &catalog(), &storage, RunOptions::default())
        .await
        .unwrap();

    let export = storage.load_records().await.unwrap().unwrap();
    assert_eq!(export.count, 3);
    assert_eq!(export.records[0].title, "Storia d'Italia");
    assert_eq!(export.records[0].link.as_deref(), Some("https://www.ibs.it/storia"));
    assert_eq!(export.records[1].description, "");
    assert_eq!(
        export.records[1].description_status,
        DescriptionStatus::NotAttempted
    );
    assert_eq!(export.records[2].description, TIMEOUT_DESCRIPTION);

    let priority = std::fs::read_to_string(dir.path().join("priority.json")).unwrap();
    let priority: serde_json::Value = serde_json::from_str(&priority).unwrap();
    assert_eq!(priority["count"], 2);
}

#[tokio::test]
async fn test_failed_run_still_closes_renderer() {
    let mut config = config();
    config.site.base_url = "not a url".to_string();
    let renderer = catalog();

    let result = run_scraper(&config, &renderer, RunOptions::default()).await;

    assert!(result.is_err());
    assert!(renderer.navigations().await.is_empty());
    assert!(renderer.is_closed());
}

#[tokio::test]
async fn test_consent_clicked_on_first_page_of_each_seed() {
    let renderer = catalog();
    let options = RunOptions {
        skip_enrichment: true,
    };
    run_scraper(&config(), &renderer, options).await.unwrap();

    assert_eq!(
        renderer.clicks().await,
        vec![HISTORY.to_string(), PHILOSOPHY.to_string()]
    );
}

#[tokio::test]
async fn test_pipeline_with_no_books_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config();
    config.seeds.truncate(1);
    let storage = LocalStorage::with_root(dir.path(), &config.output);
    let renderer = MemoryRenderer::new().with_page(HISTORY, listing(&[]));

    let outcome = run_pipeline(&config, &renderer, &storage, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.unique, 0);
    assert!(storage.load_records().await.unwrap().is_none());
    assert!(renderer.is_closed());
}
