use std::collections::HashSet;

use url::Url;

use crate::types::Source;

/// Two-level public suffixes where the registrable domain keeps three
/// labels instead of two. Curated, not a full public-suffix list.
const COMPOUND_SUFFIXES: [&str; 14] = [
    "co.uk", "org.uk", "ac.uk", "gov.uk", "co.jp", "com.au", "net.au", "com.br", "com.ar",
    "com.mx", "com.tr", "com.cn", "com.sg", "com.hk",
];

/// Known publisher display names, keyed by registrable domain.
const OUTLETS: [(&str, &str); 64] = [
    ("nytimes.com", "New York Times"),
    ("washingtonpost.com", "The Washington Post"),
    ("wsj.com", "Wall Street Journal"),
    ("usatoday.com", "USA Today"),
    ("latimes.com", "Los Angeles Times"),
    ("nypost.com", "New York Post"),
    ("bbc.co.uk", "BBC News"),
    ("bbc.com", "BBC News"),
    ("theguardian.com", "The Guardian"),
    ("telegraph.co.uk", "The Telegraph"),
    ("thetimes.co.uk", "The Times"),
    ("independent.co.uk", "The Independent"),
    ("dailymail.co.uk", "Daily Mail"),
    ("mirror.co.uk", "The Mirror"),
    ("sky.com", "Sky News"),
    ("reuters.com", "Reuters"),
    ("apnews.com", "Associated Press"),
    ("afp.com", "Agence France-Presse"),
    ("cnn.com", "CNN"),
    ("foxnews.com", "Fox News"),
    ("nbcnews.com", "NBC News"),
    ("abcnews.go.com", "ABC News"),
    ("cbsnews.com", "CBS News"),
    ("msnbc.com", "MSNBC"),
    ("npr.org", "NPR"),
    ("pbs.org", "PBS NewsHour"),
    ("voanews.com", "VOA News"),
    ("politico.com", "Politico"),
    ("axios.com", "Axios"),
    ("thehill.com", "The Hill"),
    ("bloomberg.com", "Bloomberg"),
    ("ft.com", "Financial Times"),
    ("economist.com", "The Economist"),
    ("forbes.com", "Forbes"),
    ("businessinsider.com", "Business Insider"),
    ("cnbc.com", "CNBC"),
    ("marketwatch.com", "MarketWatch"),
    ("vox.com", "Vox"),
    ("slate.com", "Slate"),
    ("theatlantic.com", "The Atlantic"),
    ("newyorker.com", "The New Yorker"),
    ("time.com", "TIME"),
    ("newsweek.com", "Newsweek"),
    ("huffpost.com", "HuffPost"),
    ("propublica.org", "ProPublica"),
    ("theintercept.com", "The Intercept"),
    ("motherjones.com", "Mother Jones"),
    ("aljazeera.com", "Al Jazeera"),
    ("dw.com", "Deutsche Welle"),
    ("france24.com", "France 24"),
    ("lemonde.fr", "Le Monde"),
    ("spiegel.de", "Der Spiegel"),
    ("elpais.com", "El Pais"),
    ("cbc.ca", "CBC News"),
    ("ctvnews.ca", "CTV News"),
    ("globeandmail.com", "The Globe and Mail"),
    ("smh.com.au", "The Sydney Morning Herald"),
    ("abc.net.au", "ABC News Australia"),
    ("news.com.au", "News.com.au"),
    ("scmp.com", "South China Morning Post"),
    ("japantimes.co.jp", "The Japan Times"),
    ("straitstimes.com", "The Straits Times"),
    ("timesofindia.com", "The Times of India"),
    ("hindustantimes.com", "Hindustan Times"),
];

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn compound_suffix(labels: &[&str]) -> bool {
    if labels.len() < 2 {
        return false;
    }
    let tail = format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
    COMPOUND_SUFFIXES.contains(&tail.as_str())
}

/// The domain suffix one organization registers: last two labels, or last
/// three when the hostname ends in a known compound public suffix
/// (`bbc.co.uk`, not `co.uk`). Hostnames with two or fewer labels
/// (`localhost`, bare TLDs) pass through unchanged.
pub fn registrable_domain(host: &str) -> String {
    let host = strip_www(host.trim()).to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }
    let keep = if compound_suffix(&labels) { 3 } else { 2 };
    labels[labels.len() - keep..].join(".")
}

fn curated(domain: &str) -> Option<&'static str> {
    OUTLETS
        .iter()
        .find(|(d, _)| *d == domain)
        .map(|(_, name)| *name)
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn derive_label(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').collect();
    let stem: &[&str] = if labels.len() >= 3 && compound_suffix(&labels) {
        &labels[..labels.len() - 2]
    } else if labels.len() >= 2 {
        &labels[..labels.len() - 1]
    } else {
        &labels
    };

    match stem.join(".").as_str() {
        "wsj" => return "Wall Street Journal".into(),
        "ft" => return "Financial Times".into(),
        _ => {}
    }

    let tokens: Vec<String> = stem
        .iter()
        .flat_map(|l| l.split(['-', '.']))
        .filter(|t| !t.is_empty())
        .map(title_case)
        .collect();
    if tokens.is_empty() {
        // last resort: the registrable domain itself
        domain.to_string()
    } else {
        tokens.join(" ")
    }
}

/// Publisher display name for a hostname or domain. Curated map first (exact
/// host, then registrable domain), then a title-cased label derived from the
/// non-TLD part of the domain.
pub fn outlet_name(host: &str) -> String {
    let host = strip_www(host.trim()).to_ascii_lowercase();
    if let Some(name) = curated(&host) {
        return name.to_string();
    }
    let domain = registrable_domain(&host);
    if let Some(name) = curated(&domain) {
        return name.to_string();
    }
    derive_label(&domain)
}

/// Citation list rendered for display: one source per registrable domain in
/// first-occurrence order. Malformed URLs are skipped, not reported. When no
/// citations exist but the reader submitted a URL, that URL stands in as the
/// sole source, labeled "Original Source".
pub fn build_sources(urls: &[String], submitted_url: Option<&str>) -> Vec<Source> {
    let fallback;
    let list: &[String] = if urls.is_empty() {
        match submitted_url {
            Some(u) => {
                fallback = [u.to_string()];
                &fallback
            }
            None => &[],
        }
    } else {
        urls
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in list {
        let Ok(parsed) = Url::parse(raw) else { continue };
        let Some(host) = parsed.host_str() else { continue };
        let domain = registrable_domain(host);
        if !seen.insert(domain) {
            continue;
        }
        let outlet = if submitted_url == Some(raw.as_str()) {
            "Original Source".to_string()
        } else {
            outlet_name(host)
        };
        out.push(Source {
            url: raw.clone(),
            outlet,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrable_domain_basics() {
        assert_eq!(registrable_domain("news.yahoo.com"), "yahoo.com");
        assert_eq!(registrable_domain("www.reuters.com"), "reuters.com");
        assert_eq!(registrable_domain("Example.COM"), "example.com");
    }

    #[test]
    fn registrable_domain_keeps_compound_suffixes() {
        assert_eq!(registrable_domain("bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("www.news.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("smh.com.au"), "smh.com.au");
    }

    #[test]
    fn short_hostnames_pass_through() {
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain(""), "");
        assert_eq!(registrable_domain("co.uk"), "co.uk");
    }

    #[test]
    fn curated_map_round_trips() {
        for (domain, name) in OUTLETS {
            assert_eq!(outlet_name(domain), name, "mismatch for {domain}");
        }
    }

    #[test]
    fn outlet_name_matches_subdomains_via_registrable_domain() {
        assert_eq!(outlet_name("edition.cnn.com"), "CNN");
        assert_eq!(outlet_name("www.theguardian.com"), "The Guardian");
    }

    #[test]
    fn unknown_domains_get_derived_labels() {
        assert_eq!(outlet_name("my-weird-blog.net"), "My Weird Blog");
        assert_eq!(outlet_name("somesite.org"), "Somesite");
        assert_eq!(outlet_name("blog.little-paper.co.uk"), "Little Paper");
    }

    #[test]
    fn abbreviation_fallbacks() {
        assert_eq!(outlet_name("wsj.de"), "Wall Street Journal");
        assert_eq!(outlet_name("ft.io"), "Financial Times");
    }

    #[test]
    fn build_sources_dedups_by_domain_in_order() {
        let urls = vec![
            "https://www.reuters.com/a".to_string(),
            "https://reuters.com/b".to_string(),
            "https://www.nytimes.com/c".to_string(),
        ];
        let sources = build_sources(&urls, None);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url, "https://www.reuters.com/a");
        assert_eq!(sources[0].outlet, "Reuters");
        assert_eq!(sources[1].outlet, "New York Times");
    }

    #[test]
    fn build_sources_skips_malformed_urls() {
        let urls = vec![
            "not a url".to_string(),
            "https://apnews.com/story".to_string(),
        ];
        let sources = build_sources(&urls, None);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].outlet, "Associated Press");
    }

    #[test]
    fn submitted_url_labeled_original_source() {
        let urls = vec!["https://example.com/article".to_string()];
        let sources = build_sources(&[], Some("https://example.com/article"));
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].outlet, "Original Source");
        // when it also appears in the citation list it keeps the label
        let sources = build_sources(&urls, Some("https://example.com/article"));
        assert_eq!(sources[0].outlet, "Original Source");
    }

    #[test]
    fn empty_inputs_yield_no_sources() {
        assert!(build_sources(&[], None).is_empty());
    }
}
