use std::fmt::Write;
use std::fs::{create_dir_all, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};

use content_schema::config::Config;
use content_schema::content::content_file::slugify;
use content_schema::content::date::format_date;

use crate::{NewArgs, PostOutput};

fn get_author(args: &NewArgs) -> String {
    if let Some(ref author) = args.author {
        return author.clone();
    }

    let name = whoami::realname();
    if name.is_empty() {
        return whoami::username();
    }
    name
}

// A JSON string is a valid double-quoted YAML scalar
fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn render_front_matter(title: &str, author: &str, date: &DateTime<Utc>) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: {}", quote(title));
    let _ = writeln!(&mut buf, "publishDate: {}", format_date(date));
    let _ = writeln!(&mut buf, "excerpt: {}", quote("Replace with a short summary"));
    let _ = writeln!(&mut buf, "author: {}", quote(author));
    let _ = writeln!(&mut buf, "tags: []");
    let _ = writeln!(&mut buf, "draft: true");
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf);
    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content");
    buf
}

fn post_file_name(title: &str, date: &DateTime<Utc>) -> Result<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        bail!("Can not build a file name from the title {:?}", title);
    }
    Ok(format!("{}-{}.md", date.format("%Y%m%d"), slug))
}

pub fn new_cmd(config: &Config, args: NewArgs) -> Result<ExitCode> {
    if args.title.trim().is_empty() {
        bail!("The title of the post can not be empty");
    }

    let author = get_author(&args);
    let date = Utc::now();
    let content = format!("{}{}", render_front_matter(&args.title, &author, &date), render_body());

    match args.output {
        PostOutput::Stdout => print!("{}", content),
        PostOutput::File => {
            use std::io::Write;
            let file_name = post_file_name(&args.title, &date)?;
            let dir = args.dir.clone().unwrap_or_else(|| config.paths.content_dir.clone());
            create_dir_all(&dir)
                .with_context(|| format!("Error creating directory {}", dir.display()))?;

            let full_path: PathBuf = dir.join(file_name);
            let mut file = OpenOptions::new().write(true).create_new(true).open(&full_path)
                .with_context(|| format!("Error creating post {}", full_path.display()))?;
            file.write_all(content.as_bytes())?;
            println!("Created post {}", full_path.display());
        }
    };

    Ok(ExitCode::SUCCESS)
}
