use ringside_core::config::{PipelineConfig, SourceConfig};
use ringside_core::retry::RetryPolicy;
use ringside_core::testutil::MockFetcher;
use ringside_core::throttle::ThrottleConfig;

/// Install a test subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(throttle: ThrottleConfig) -> PipelineConfig {
    PipelineConfig {
        rankings_retry: RetryPolicy::new(2),
        page_retry: RetryPolicy::new(2),
        throttle,
        ..PipelineConfig::default()
    }
}

pub const RANKINGS: &str = r#"<html><body>
<div class="view-grouping">
  <div class="view-grouping-header">Men's Pound-for-Pound Top Rank</div>
  <div class="view-grouping-content"><table>
    <caption><h5><a href="/athlete/z">Zed</a></h5></caption>
    <tbody><tr>
      <td class="views-field views-field-weight-class-rank">#1</td>
      <td class="views-field views-field-title"><a href="/athlete/z">Zed</a></td>
    </tr></tbody>
  </table></div>
</div>
<div class="view-grouping">
  <div class="view-grouping-header">Flyweight</div>
  <div class="view-grouping-content"><table>
    <caption><div class="rankings--athlete--champion"><h5><a href="/athlete/a">Alpha</a></h5></div></caption>
    <tbody>
      <tr>
        <td class="views-field views-field-weight-class-rank">#1</td>
        <td class="views-field views-field-title"><a href="/athlete/b">Bravo</a></td>
        <td class="views-field views-field-weight-class-rank-change">Rank increased by 2</td>
      </tr>
      <tr>
        <td class="views-field views-field-weight-class-rank">#2</td>
        <td class="views-field views-field-title"><a href="/athlete/c">Charlie</a></td>
        <td class="views-field views-field-weight-class-rank-change">Rank decreased by 1</td>
      </tr>
    </tbody>
  </table></div>
</div>
</body></html>"#;

pub const LOC_A: &str = "/fightcenter/fighters/1-alpha";
pub const LOC_B: &str = "/fightcenter/fighters/2-bravo";
pub const LOC_C: &str = "/fightcenter/fighters/3-charlie";
pub const LOC_Z: &str = "/fightcenter/fighters/99-zed";

pub fn search_results(locator: &str) -> String {
    format!(
        r#"<html><body><table class="fcLeaderboard">
        <tr><th>Name</th><th>Record</th></tr>
        <tr><td><a href="{locator}">Result</a></td><td>20-1-0</td></tr>
        <tr><td><a href="/fightcenter/fighters/777-someone-else">Someone Else</a></td></tr>
        </table></body></html>"#
    )
}

/// One bout row; `badge = None` renders an upcoming bout.
pub fn bout_row(opponent: &str, badge: Option<&str>, year: &str, month_day: &str) -> String {
    let result = match badge {
        Some(b) => format!(r#"<div class="result"><span>{b}</span></div>"#),
        None => r#"<a title="Confirmed Upcoming Bout" href="/fightcenter/bouts/5">Confirmed</a>"#.to_string(),
    };
    format!(
        r#"<li>{result}<div class="opponent"><a href="{opponent}">Opponent</a></div>
        <div class="date"><span class="year">{year}</span><span class="monthDay">{month_day}</span></div></li>"#
    )
}

pub fn detail_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><nav><a href="/fightcenter/fighters/0-nav">Featured</a></nav>
        <section class="fighterFightResults"><ul>
        <li class="recordHeader">Pro MMA Record</li>
        {}
        </ul></section></body></html>"#,
        rows.concat()
    )
}

pub fn page_alpha() -> String {
    detail_page(&[
        bout_row(LOC_B, Some("W"), "2025", "Oct 25"),
        bout_row(LOC_Z, Some("L"), "2024", "Jun 01"),
        bout_row(LOC_C, Some("W"), "2024", "Mar 01"),
        bout_row(LOC_C, Some("C"), "2024", "Jan 01"),
    ])
}

pub fn page_bravo() -> String {
    detail_page(&[
        bout_row(LOC_C, None, "2026", "Dec 12"),
        bout_row(LOC_A, Some("L"), "2025", "Oct 25"),
    ])
}

pub fn page_charlie() -> String {
    detail_page(&[
        bout_row(LOC_B, None, "2026", "Dec 12"),
        bout_row(LOC_A, Some("L"), "2024", "Mar 01"),
        bout_row(LOC_A, Some("C"), "2024", "Jan 01"),
    ])
}

pub fn search_url(sources: &SourceConfig, name: &str) -> String {
    sources.search_url_for(name).to_string()
}

pub fn detail_url(sources: &SourceConfig, locator: &str) -> String {
    sources.detail_url(locator).map(|u| u.to_string()).unwrap()
}

/// A fetcher serving the three-fighter world.
pub fn world(sources: &SourceConfig) -> MockFetcher {
    world_with_pages(sources, page_alpha(), page_bravo(), page_charlie())
}

pub fn world_with_pages(
    sources: &SourceConfig,
    alpha: String,
    bravo: String,
    charlie: String,
) -> MockFetcher {
    MockFetcher::default()
        .route(sources.rankings_url.as_str(), RANKINGS)
        .route(search_url(sources, "Alpha"), search_results(LOC_A))
        .route(search_url(sources, "Bravo"), search_results(LOC_B))
        .route(search_url(sources, "Charlie"), search_results(LOC_C))
        .route(detail_url(sources, LOC_A), alpha)
        .route(detail_url(sources, LOC_B), bravo)
        .route(detail_url(sources, LOC_C), charlie)
}
