use visitor_stats::output::{JsonPresenter, Presenter};
use visitor_stats::parser::{decode_table, parse_samples};
use visitor_stats::pipeline::{Dashboard, Outcome, build_dashboard, fetch_rows, publish};
use visitor_stats::sample::ONE_DAY_MS;
use visitor_stats::stats::ArrivalStats;
use visitor_stats::window::select;

const FIXTURE: &[u8] = include_bytes!("fixtures/sample_feed.csv");
const LATEST_MS: i64 = 1_760_000_000_000;

#[derive(Default)]
struct CountingPresenter {
    renders: usize,
    errors: usize,
}

impl Presenter for CountingPresenter {
    fn render(&mut self, _dashboard: &Dashboard) -> anyhow::Result<()> {
        self.renders += 1;
        Ok(())
    }

    fn render_error(&mut self, _message: &str) -> anyhow::Result<()> {
        self.errors += 1;
        Ok(())
    }
}

#[test]
fn test_full_pipeline() {
    let rows = decode_table(FIXTURE).expect("Failed to decode fixture");
    let dashboard = build_dashboard(&rows).expect("Fixture has valid samples");

    assert_eq!(dashboard.sample_count, 81);
    assert_eq!(dashboard.latest.timestamp_millis(), LATEST_MS);
    assert_eq!(
        dashboard.stats,
        ArrivalStats {
            arrivals_24h: 76.0,
            peak_24h: 51.0,
            arrivals_7d: 93.0,
            arrivals_total: 100.0,
        }
    );
    assert_eq!(dashboard.window.len(), 49);
    assert!(
        dashboard
            .window
            .iter()
            .all(|p| LATEST_MS - p.timestamp_ms() <= ONE_DAY_MS)
    );
    assert!(dashboard.window.windows(2).all(|w| w[0].time < w[1].time));
}

#[test]
fn test_scenario_a_from_csv() {
    let rows = decode_table(b"1000,4\n2000,5\n3000,4\n").unwrap();
    let samples = parse_samples(&rows);
    let stats = ArrivalStats::estimate(&samples);

    let timestamps: Vec<i64> = samples.iter().map(|s| s.timestamp_ms()).collect();
    assert_eq!(timestamps, vec![1_000_000, 2_000_000, 3_000_000]);
    assert_eq!(stats.arrivals_total, 5.0);
    assert_eq!(stats.peak_24h, 5.0);
}

#[test]
fn test_scenario_b_null_value_dropped() {
    let rows = decode_table(b"1000,4\n2000,\n3000,6\n").unwrap();
    let samples = parse_samples(&rows);
    let stats = ArrivalStats::estimate(&samples);

    assert_eq!(samples.len(), 2);
    assert_eq!(stats.arrivals_total, 6.0);
}

#[test]
fn test_scenario_c_decreasing_over_ten_days() {
    let csv: String = (0..=10)
        .map(|day| format!("{},{}\n", 1_700_000_000 + day * 86_400, -day))
        .collect();
    let dashboard = build_dashboard(&decode_table(csv.as_bytes()).unwrap()).unwrap();

    assert_eq!(dashboard.stats, ArrivalStats::default());
}

#[test]
fn test_scenario_d_no_valid_rows_never_renders() {
    let fetched = decode_table(b"0,4\n,5\nnot-a-time,6\n1000,\n");
    let mut presenter = CountingPresenter::default();

    assert_eq!(publish(fetched, &mut presenter), Outcome::Empty);
    assert_eq!(presenter.renders, 0);
    assert_eq!(presenter.errors, 0);
}

#[test]
fn test_decode_failure_reports_once() {
    let fetched = decode_table(&[0xC3, 0x28, b',', b'1']);
    let mut presenter = CountingPresenter::default();

    assert_eq!(publish(fetched, &mut presenter), Outcome::Failed);
    assert_eq!(presenter.renders, 0);
    assert_eq!(presenter.errors, 1);
}

#[test]
fn test_order_independence() {
    let text = std::str::from_utf8(FIXTURE).unwrap();
    let mut lines: Vec<&str> = text.lines().collect();
    let baseline = build_dashboard(&decode_table(FIXTURE).unwrap()).unwrap();

    lines.reverse();
    let reversed = build_dashboard(&decode_table(lines.join("\n").as_bytes()).unwrap()).unwrap();
    lines.rotate_left(17);
    let rotated = build_dashboard(&decode_table(lines.join("\n").as_bytes()).unwrap()).unwrap();

    assert_eq!(baseline, reversed);
    assert_eq!(baseline, rotated);
    assert_eq!(select(&parse_samples(&decode_table(FIXTURE).unwrap())), baseline.window);
}

#[test]
fn test_idempotent_json_output() {
    let render = || {
        let tz = chrono::FixedOffset::east_opt(0).unwrap();
        let mut presenter = JsonPresenter::new(Vec::new(), tz);
        let outcome = publish(decode_table(FIXTURE), &mut presenter);
        assert_eq!(outcome, Outcome::Rendered);
        presenter.into_inner()
    };

    let first = render();
    assert_eq!(first, render());

    let json: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(json["stats"]["arrivalsTotal"], "100");
    assert!(json["chart"]["x_axis"]["ticks"].as_array().unwrap().len() <= 8);
}

#[tokio::test]
async fn test_fetch_rows_from_local_fixture() {
    let client = visitor_stats::fetch::BasicClient::new();
    let rows = fetch_rows(&client, "tests/fixtures/sample_feed.csv")
        .await
        .expect("Failed to load fixture");

    assert_eq!(rows.len(), 86);
}
