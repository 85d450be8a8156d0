use colored::Colorize;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_LINEUP_URL: &str = "https://lowlands.nl/acts/";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

const USER_AGENT: &str = "Mozilla/5.0";

const ACT_LINK_SELECTOR: &str = "a.act-list-item__button";
const ACT_NAME_SELECTOR: &str = "h2";
const SPOTIFY_LINK_SELECTOR: &str = "li.act-detail__social-item a[href*='spotify.com']";

const UNKNOWN_ARTIST: &str = "Unknown";

/// An act as listed on the lineup overview page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupEntry {
    pub name: String,
    pub page_url: String,
}

/// An act after its detail page has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupArtist {
    pub name: String,
    pub page_url: String,
    pub spotify_url: Option<String>,
}

pub struct LineupScraper {
    http_client: Client,
    lineup_url: Url,
    delay: Duration,
}

impl LineupScraper {
    pub fn new(lineup_url: &str, delay: Duration) -> Result<Self> {
        let lineup_url = Url::parse(lineup_url)
            .map_err(|e| AppError::Config(format!("Invalid lineup URL {}: {}", lineup_url, e)))?;

        let http_client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            lineup_url,
            delay,
        })
    }

    pub fn lineup_url(&self) -> &Url {
        &self.lineup_url
    }

    /// Scrape the lineup and every act's detail page.
    ///
    /// A lineup page that can't be fetched yields no artists; an act page that
    /// can't be fetched drops that act. Both are logged and never abort the run.
    pub async fn fetch_artists(&self) -> Result<Vec<LineupArtist>> {
        let overview = match self.fetch_page(self.lineup_url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                println!("{}", format!("Error fetching lineup website: {}", e).red());
                warn!("Failed to fetch lineup page {}: {}", self.lineup_url, e);
                return Ok(Vec::new());
            }
        };

        let entries = parse_lineup_page(&overview, &self.lineup_url)?;
        info!("Found {} acts on {}", entries.len(), self.lineup_url);

        let mut artists = Vec::new();
        for entry in entries {
            let body = match self.fetch_page(&entry.page_url).await {
                Ok(body) => body,
                Err(e) => {
                    println!(
                        "{}",
                        format!("Could not fetch artist page for {}", entry.name).yellow()
                    );
                    warn!("Failed to fetch {}: {}", entry.page_url, e);
                    continue;
                }
            };

            let spotify_url = parse_artist_page(&body)?;
            println!(
                "{} {}: {}",
                "Added".green(),
                entry.name,
                spotify_url.as_deref().unwrap_or("No Spotify link")
            );

            artists.push(LineupArtist {
                name: entry.name,
                page_url: entry.page_url,
                spotify_url,
            });

            tokio::time::sleep(self.delay).await;
        }

        println!(
            "\n{}",
            format!("Total artists found: {}", artists.len()).green()
        );
        Ok(artists)
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Scrape(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

/// Collect the acts linked from the lineup overview.
///
/// Hrefs are resolved against `base`, so both site-relative and absolute
/// links work. Anchors without an href are skipped.
pub fn parse_lineup_page(html: &str, base: &Url) -> Result<Vec<LineupEntry>> {
    let document = Html::parse_document(html);
    let link_selector = get_selector(ACT_LINK_SELECTOR)?;
    let name_selector = get_selector(ACT_NAME_SELECTOR)?;

    let mut entries = Vec::new();
    for element in document.select(&link_selector) {
        let name = element
            .select(&name_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

        let Some(href) = element.value().attr("href") else {
            warn!("Skipping act without link: {}", name);
            continue;
        };

        match base.join(href) {
            Ok(page_url) => entries.push(LineupEntry {
                name,
                page_url: page_url.to_string(),
            }),
            Err(e) => warn!("Skipping act {} with bad link {:?}: {}", name, href, e),
        }
    }

    Ok(entries)
}

/// The first Spotify link among an act's social links, if any.
pub fn parse_artist_page(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let selector = get_selector(SPOTIFY_LINK_SELECTOR)?;

    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.trim().to_string()))
}

fn get_selector(selector: &'static str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::Scrape(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEUP_HTML: &str = r#"
        <html><body>
          <ul class="act-list">
            <li><a class="act-list-item__button" href="/acts/tame-impala/">
              <h2> Tame Impala </h2>
            </a></li>
            <li><a class="act-list-item__button" href="https://lowlands.nl/acts/fontaines-dc/">
              <h2>Fontaines D.C.</h2>
            </a></li>
            <li><a class="act-list-item__button" href="/acts/mystery/"></a></li>
            <li><a class="act-list-item__button"><h2>No Link</h2></a></li>
            <li><a class="other-link" href="/tickets/"><h2>Tickets</h2></a></li>
          </ul>
        </body></html>
    "#;

    fn base() -> Url {
        Url::parse(DEFAULT_LINEUP_URL).unwrap()
    }

    #[test]
    fn test_parse_lineup_page() {
        let entries = parse_lineup_page(LINEUP_HTML, &base()).unwrap();

        assert_eq!(
            entries,
            vec![
                LineupEntry {
                    name: "Tame Impala".to_string(),
                    page_url: "https://lowlands.nl/acts/tame-impala/".to_string(),
                },
                LineupEntry {
                    name: "Fontaines D.C.".to_string(),
                    page_url: "https://lowlands.nl/acts/fontaines-dc/".to_string(),
                },
                LineupEntry {
                    name: "Unknown".to_string(),
                    page_url: "https://lowlands.nl/acts/mystery/".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_lineup_page_without_acts() {
        let entries = parse_lineup_page("<html><body><p>Coming soon</p></body></html>", &base())
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_artist_page_with_spotify_link() {
        let html = r#"
            <ul class="act-detail__social">
              <li class="act-detail__social-item"><a href="https://www.instagram.com/tameimpala">IG</a></li>
              <li class="act-detail__social-item"><a href="https://open.spotify.com/artist/5INjqkS1o8h1imAzPqGZBb?si=x">Spotify</a></li>
              <li class="act-detail__social-item"><a href="https://open.spotify.com/artist/other">Spotify 2</a></li>
            </ul>
        "#;

        assert_eq!(
            parse_artist_page(html).unwrap(),
            Some("https://open.spotify.com/artist/5INjqkS1o8h1imAzPqGZBb?si=x".to_string())
        );
    }

    #[test]
    fn test_parse_artist_page_without_spotify_link() {
        let html = r#"
            <ul>
              <li class="act-detail__social-item"><a href="https://www.youtube.com/@act">YouTube</a></li>
              <li class="other-item"><a href="https://open.spotify.com/artist/5INjqkS1o8h1imAzPqGZBb">Spotify</a></li>
            </ul>
        "#;

        assert_eq!(parse_artist_page(html).unwrap(), None);
    }

    #[test]
    fn test_scraper_rejects_invalid_url() {
        assert!(LineupScraper::new("not a url", DEFAULT_REQUEST_DELAY).is_err());
    }

    /// Serve canned pages on a random local port; unknown paths are 404.
    async fn serve(routes: Vec<(&'static str, u16, String)>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, body.as_str()))
                    .unwrap_or((404, ""));
                let reason = match status {
                    200 => "OK",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.ok();
                stream.shutdown().await.ok();
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unreachable_lineup_page_yields_no_artists() {
        let base = serve(vec![("/acts/", 500, "oops".to_string())]).await;
        let scraper = LineupScraper::new(&format!("{}/acts/", base), Duration::ZERO).unwrap();

        let artists = scraper.fetch_artists().await.unwrap();

        assert!(artists.is_empty());
    }

    #[tokio::test]
    async fn test_failed_artist_page_skips_that_act() {
        let lineup = r#"
            <a class="act-list-item__button" href="/acts/gone/"><h2>Gone</h2></a>
            <a class="act-list-item__button" href="/acts/ok/"><h2>Ok</h2></a>
        "#;
        let act = r#"
            <li class="act-detail__social-item"><a href="https://open.spotify.com/artist/abc123">Spotify</a></li>
        "#;
        let base = serve(vec![
            ("/acts/", 200, lineup.to_string()),
            ("/acts/ok/", 200, act.to_string()),
        ])
        .await;
        let scraper = LineupScraper::new(&format!("{}/acts/", base), Duration::ZERO).unwrap();

        let artists = scraper.fetch_artists().await.unwrap();

        assert_eq!(
            artists,
            vec![LineupArtist {
                name: "Ok".to_string(),
                page_url: format!("{}/acts/ok/", base),
                spotify_url: Some("https://open.spotify.com/artist/abc123".to_string()),
            }]
        );
    }
}
