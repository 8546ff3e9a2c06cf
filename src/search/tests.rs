use crate::config::SiteConfig;
use crate::fetchers::{FetchError, MemoryFetcher, MemoryPage, PageFetcher};
use crate::filter::PageFilter;
use crate::layout::Point;
use crate::parsers::ElementKind;
use crate::search::{PanelContent, SearchAggregator, SearchOutcome, SearchSession};
use std::time::Duration;
use url::Url;

const PAGE_A: &str = "http://intra.example/PageA.html";
const PAGE_B: &str = "http://intra.example/sub/PageB.html";
const PAGE_C: &str = "http://intra.example/PageC.html";

const BODY_A: &str = r#"<html><body>
    <h2 class="page-title">Secretaria</h2>
    <div class="buttons-container">
        <div class="collapsible-group">
            <button class="toggle-btn">Relatórios ▼</button>
            <div class="collapsible-content"><a class="sub-link" href="mensal.html">Mensal</a></div>
        </div>
    </div>
</body></html>"#;

const BODY_B: &str = r#"<html><body>
    <h2 class="page-title">Tesouraria</h2>
    <div class="buttons-container">
        <a class="btn" href="x.html">Relatórios Gerais</a>
        <a class="btn" href="boletos.html">Boletos</a>
    </div>
</body></html>"#;

fn aggregator(fetcher: MemoryFetcher, pages: &[&str]) -> SearchAggregator<MemoryFetcher> {
    SearchAggregator::new(fetcher, PageFilter::default().select_pages(pages))
}

fn session(fetcher: MemoryFetcher, pages: &[&str]) -> SearchSession<MemoryFetcher> {
    SearchSession::from_config(aggregator(fetcher, pages), &SiteConfig::default())
}

fn fixtures() -> MemoryFetcher {
    MemoryFetcher::new()
        .with_body(PAGE_A, BODY_A)
        .with_body(PAGE_B, BODY_B)
}

/// Fails inside the fan-out itself rather than per page
struct PanickingFetcher;

impl PageFetcher for PanickingFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        panic!("fixture failure for {url}");
    }
}

mod aggregator_tests {
    use super::*;

    #[tokio::test]
    async fn test_two_page_scenario() {
        let agg = aggregator(fixtures(), &[PAGE_A, PAGE_B]);
        let results = agg.collect("relator").await.unwrap();

        assert_eq!(results.len(), 2);
        let first = &results.items()[0];
        assert_eq!(first.source.as_str(), PAGE_A);
        assert_eq!(first.target.as_str(), PAGE_A);
        assert_eq!(first.text, "Relatórios");
        assert_eq!(first.kind, ElementKind::ToggleButton);

        let second = &results.items()[1];
        assert_eq!(second.source.as_str(), PAGE_B);
        assert_eq!(second.target.as_str(), "http://intra.example/sub/x.html");
        assert_eq!(second.text, "Relatórios Gerais");
    }

    #[tokio::test]
    async fn test_short_query_issues_no_fetches() {
        let agg = aggregator(fixtures(), &[PAGE_A, PAGE_B]);
        let results = agg.collect(" a ").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(agg.fetcher().requests(), 0);
    }

    #[tokio::test]
    async fn test_failing_page_is_tolerated() {
        let fetcher = fixtures().with_page(PAGE_C, MemoryPage::Status(404));
        let agg = aggregator(fetcher, &[PAGE_C, PAGE_A, PAGE_B]);
        let results = agg.collect("relat").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(agg.fetcher().requests(), 3);
    }

    #[tokio::test]
    async fn test_same_query_same_order() {
        let agg = aggregator(fixtures(), &[PAGE_B, PAGE_A]);
        let first = agg.collect("re").await.unwrap();
        let second = agg.collect("re").await.unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
        // Page list order, not discovery speed
        assert_eq!(first.items()[0].source.as_str(), PAGE_B);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_follows_page_list_not_completion() {
        let fetcher = MemoryFetcher::new()
            .with_page(PAGE_A, MemoryPage::Delayed(Duration::from_secs(2), BODY_A.to_string()))
            .with_body(PAGE_B, BODY_B);
        let agg = aggregator(fetcher, &[PAGE_A, PAGE_B]);
        let results = agg.collect("relat").await.unwrap();
        assert_eq!(results.items()[0].source.as_str(), PAGE_A);
        assert_eq!(results.items()[1].source.as_str(), PAGE_B);
    }

    #[tokio::test]
    async fn test_dedup_across_pages() {
        let shared = r#"<a class="btn" href="http://intra.example/manuais.html">Manuais</a>"#;
        let fetcher = MemoryFetcher::new()
            .with_body(PAGE_A, shared)
            .with_body(PAGE_C, &shared.replace("Manuais", " MANUAIS "));
        let agg = aggregator(fetcher, &[PAGE_A, PAGE_C]);
        let results = agg.collect("manu").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.items()[0].source.as_str(), PAGE_A);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_page_times_out() {
        let fetcher = fixtures().with_page(PAGE_C, MemoryPage::Hang);
        let agg = aggregator(fetcher, &[PAGE_A, PAGE_C, PAGE_B])
            .with_fetch_timeout(Duration::from_secs(3));
        let results = agg.collect("relat").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_pages_are_timed_from_their_turn() {
        let slow = |body: &str| MemoryPage::Delayed(Duration::from_secs(4), body.to_string());
        let fetcher = MemoryFetcher::new()
            .serialized()
            .with_page(PAGE_A, slow(BODY_A))
            .with_page(PAGE_B, slow(BODY_B))
            .with_page(PAGE_C, slow(r#"<a class="btn" href="anual.html">Relatório Anual</a>"#));
        let agg = aggregator(fetcher, &[PAGE_A, PAGE_B, PAGE_C])
            .with_fetch_timeout(Duration::from_secs(10));

        // 12 s in total, but no single load exceeds its 10 s budget
        let results = agg.collect("relat").await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.items()[2].text, "Relatório Anual");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_load_still_times_out_when_serialized() {
        let fetcher = fixtures()
            .serialized()
            .with_page(PAGE_C, MemoryPage::Delayed(Duration::from_secs(30), BODY_A.to_string()));
        let agg = aggregator(fetcher, &[PAGE_C, PAGE_A, PAGE_B])
            .with_fetch_timeout(Duration::from_secs(5));
        let results = agg.collect("relat").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_query_of_bare_combining_marks_is_not_searched() {
        let agg = aggregator(fixtures(), &[PAGE_A, PAGE_B]);
        assert!(!agg.is_searchable("\u{301}\u{301}"));
        let results = agg.collect("\u{301}\u{301}").await.unwrap();
        assert!(results.is_empty());
        assert_eq!(agg.fetcher().requests(), 0);
    }

    #[tokio::test]
    async fn test_fan_out_failure_is_an_error() {
        let agg = SearchAggregator::new(
            PanickingFetcher,
            vec![Url::parse(PAGE_A).unwrap()],
        );
        assert!(agg.collect("relat").await.is_err());
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_results_render_into_panel() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        assert_eq!(s.search("relator").await, SearchOutcome::Results(2));

        let panel = s.panel();
        assert!(panel.is_open());
        assert!(!panel.is_error());
        let html = panel.render_html();
        assert!(html.contains(">Grupo: Relatórios</a>"));
        assert!(html.contains("href=\"http://intra.example/sub/x.html\""));
        assert!(html.contains("title=\"Encontrado em: PageB.html\""));
    }

    #[tokio::test]
    async fn test_short_query_closes_panel() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        s.search("relat").await;
        assert!(s.panel().is_open());

        assert_eq!(s.search("a").await, SearchOutcome::Cleared);
        let panel = s.panel();
        assert!(!panel.is_open());
        assert_eq!(panel.content(), &PanelContent::Empty);
        assert_eq!(s.aggregator().fetcher().requests(), 2);
    }

    #[tokio::test]
    async fn test_no_results_state() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        assert_eq!(s.search("inexistente").await, SearchOutcome::NoResults);

        let panel = s.panel();
        assert!(panel.is_open());
        assert!(panel.is_error());
        assert_eq!(
            panel.render_html(),
            "<p class=\"no-results-message\">Nenhum resultado encontrado.</p>\n"
        );
    }

    #[tokio::test]
    async fn test_failure_state() {
        let agg = SearchAggregator::new(PanickingFetcher, vec![Url::parse(PAGE_A).unwrap()]);
        let s = SearchSession::from_config(agg, &SiteConfig::default());
        assert_eq!(s.search("relat").await, SearchOutcome::Failed);

        let panel = s.panel();
        assert!(panel.is_error());
        assert!(panel.render_text().contains("Ocorreu um erro"));

        // Recoverable by searching again
        assert_eq!(s.search("a").await, SearchOutcome::Cleared);
        assert!(!s.panel().is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_search_is_discarded() {
        let slow = MemoryFetcher::new()
            .with_page(PAGE_A, MemoryPage::Delayed(Duration::from_secs(1), BODY_A.to_string()))
            .with_page(PAGE_B, MemoryPage::Delayed(Duration::from_secs(1), BODY_B.to_string()));
        let s = session(slow, &[PAGE_A, PAGE_B]);

        let older = {
            let s = s.clone();
            tokio::spawn(async move { s.search("relat").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(s.search("boletos").await, SearchOutcome::Results(1));
        assert_eq!(older.await.unwrap(), SearchOutcome::Superseded);

        let panel = s.panel();
        let results = panel.results().unwrap();
        assert_eq!(results.items()[0].text, "Boletos");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_cancels_in_flight_search() {
        let slow = MemoryFetcher::new()
            .with_page(PAGE_A, MemoryPage::Delayed(Duration::from_secs(1), BODY_A.to_string()));
        let s = session(slow, &[PAGE_A]);

        let in_flight = {
            let s = s.clone();
            tokio::spawn(async move { s.search("relat").await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(s.panel().is_open());

        s.input("r");
        assert_eq!(in_flight.await.unwrap(), SearchOutcome::Superseded);
        assert!(!s.panel().is_open());
        assert_eq!(s.panel().content(), &PanelContent::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_is_debounced() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);

        // Panel closed: the first searchable input goes out at once
        s.input("re");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(s.panel().is_open());
        assert_eq!(s.generation(), 1);

        for text in ["rel", "rela", "relat"] {
            s.input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(s.is_pending());
        assert_eq!(s.generation(), 1);

        s.settle().await;
        assert_eq!(s.generation(), 2);
        assert_eq!(s.aggregator().fetcher().requests(), 4);
        assert_eq!(s.panel().results().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_on_closed_panel_searches_once() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        assert_eq!(s.search("relat").await, SearchOutcome::Results(2));
        s.settle().await;

        assert_eq!(s.generation(), 1);
        assert_eq!(s.aggregator().fetcher().requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_bypasses_debounce() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        s.search("re").await;
        let before = s.aggregator().fetcher().requests();

        s.input("boletos");
        assert!(s.is_pending());
        assert_eq!(s.submit().await, SearchOutcome::Results(1));
        assert!(!s.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        s.settle().await;
        assert_eq!(s.aggregator().fetcher().requests(), before + 2);
    }

    #[tokio::test]
    async fn test_click_outside_dismisses() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        s.search("relat").await;
        let bar = s.layout().search_bar;

        // Inside the search bar
        assert!(!s.click_at(Point::new(bar.left + 5.0, bar.top + 5.0)));
        assert!(s.panel().is_open());

        // Far below the panel
        assert!(s.click_at(Point::new(bar.left + 5.0, s.layout().footer_top + 20.0)));
        assert!(!s.panel().is_open());

        // Nothing left to dismiss
        assert!(!s.click_at(Point::new(0.0, 0.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_reopens_dismissed_panel() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        s.search("relat").await;
        s.click_at(Point::new(-10.0, -10.0));
        assert!(!s.panel().is_open());

        s.input("relato");
        assert!(!s.is_pending());
        s.settle().await;
        assert!(s.panel().is_open());
        assert_eq!(s.panel().results().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_burst_applies_last_layout() {
        let s = session(fixtures(), &[PAGE_A, PAGE_B]);
        s.search("relat").await;
        for _ in 0..50 {
            s.tick(Duration::from_millis(16));
        }
        let open_height = s.panel().height();
        assert_eq!(open_height, 90.0);

        let mut cramped = s.layout();
        for footer in [300.0, 250.0, 180.0] {
            cramped.footer_top = footer;
            s.on_resize(cramped);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(s.panel().height(), open_height);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(s.layout().footer_top, 180.0);
        // 180 - bar bottom 128 - margin 10
        assert_eq!(s.panel().height(), 42.0);
    }
}
