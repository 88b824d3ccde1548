#[cfg(test)]
pub const POST_YAML: &str = "---
title: What I learned after 20+ years of software development
publishDate: 2022-04-02 12:05:00
excerpt: Someone asked me how to be a great software engineer.
author: thiago
category: Career
tags:
  - career
  - engineering
draft: false
---
How to be a great software engineer?

Someone asked me this question today and I didn’t have an answer. After thinking for a while, I came up with a list of what I try to do myself.

<!-- more -->

## Non technical
";

#[cfg(test)]
pub const POST_TOML: &str = "+++
title = \"Rust in production\"
publishDate = 2024-02-12T22:54:00Z
updateDate = 2024-03-01
excerpt = \"Notes from a year of running Rust services\"
tags = [\"rust\"]

[metadata]
canonical = \"https://example.com/rust\"
+++
# Body
";

#[cfg(test)]
pub const POST_INVALID: &str = "---
title: 42
excerpt: Missing a date
publishDate: someday
---
Body
";

#[cfg(test)]
pub const SITE_CONFIG: &str = r##"
[paths]
content_dir = "src/content/post"

[site]
base_path = "/blog/"

[log]
level = "Debug"
log_to_console = false

[navigation.header]
links = [
    { text = "About", href = "/about" },
    { text = "Articles", href = "articles" },
]

[navigation.footer]
secondary_links = [
    { text = "Terms", href = "/terms" },
]
social_links = [
    { aria_label = "Github", icon = "tabler:brand-github", href = "https://github.com/apex" },
]
foot_note = "&copy; {year} Apex Data Labs. All rights reserved."
"##;
