//! Site header and footer navigation data.
//!
//! Read from the `[navigation]` table of the configuration. Internal links
//! are written relative to the site and turned into permalinks under the
//! configured base path by [`Navigation::resolve`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// A titled column of footer links.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SocialLink {
    pub aria_label: String,
    pub icon: String,
    pub href: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Header {
    pub links: Vec<Link>,
    pub actions: Vec<Link>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct Footer {
    pub links: Vec<LinkGroup>,
    pub secondary_links: Vec<Link>,
    pub social_links: Vec<SocialLink>,
    pub foot_note: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Navigation {
    pub header: Header,
    pub footer: Footer,
}

fn link(text: &str, href: &str) -> Link {
    Link { text: text.to_string(), href: href.to_string() }
}

impl Default for Header {
    fn default() -> Self {
        Header {
            links: vec![
                link("About", "/about"),
                link("Projects", "/projects"),
                link("Articles", "/articles"),
                link("Contact", "/contact"),
            ],
            actions: vec![],
        }
    }
}

impl Default for Footer {
    fn default() -> Self {
        Footer {
            links: vec![],
            secondary_links: vec![
                link("Terms", "/terms"),
                link("Privacy Policy", "/privacy"),
            ],
            social_links: vec![
                SocialLink {
                    aria_label: "LinkedIn".to_string(),
                    icon: "tabler:brand-linkedin".to_string(),
                    href: "https://linkedin.com/company/apex-data-lab".to_string(),
                },
                SocialLink {
                    aria_label: "Github".to_string(),
                    icon: "tabler:brand-github".to_string(),
                    href: "https://github.com/pythongurfer/apex-data-labs".to_string(),
                },
            ],
            foot_note: format!("&copy; {} Apex Data Labs. All rights reserved.", YEAR_PLACEHOLDER),
        }
    }
}

fn is_external(href: &str) -> bool {
    href.contains("://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#')
}

/// Joins `path` under `base`. Absolute URLs, `mailto:`/`tel:` links and
/// fragments are returned as they are.
pub fn permalink(base: &str, path: &str) -> String {
    lazy_static! {
        static ref SLASHES: Regex = Regex::new(r"/{2,}").unwrap();
    }

    if is_external(path) {
        return path.to_string();
    }

    let joined = format!("/{}/{}", base, path);
    let collapsed = SLASHES.replace_all(&joined, "/");
    let trimmed = collapsed.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn resolve_links(base: &str, links: &mut [Link]) {
    for l in links {
        l.href = permalink(base, &l.href);
    }
}

impl Navigation {
    /// Copy with every internal href under `base` and `{year}` in the foot
    /// note replaced by `year`.
    pub fn resolve(&self, base: &str, year: i32) -> Navigation {
        let mut nav = self.clone();

        resolve_links(base, &mut nav.header.links);
        resolve_links(base, &mut nav.header.actions);
        for group in &mut nav.footer.links {
            resolve_links(base, &mut group.links);
        }
        resolve_links(base, &mut nav.footer.secondary_links);
        for social in &mut nav.footer.social_links {
            social.href = permalink(base, &social.href);
        }
        nav.footer.foot_note = nav.footer.foot_note.replace(YEAR_PLACEHOLDER, &year.to_string());

        nav
    }
}
