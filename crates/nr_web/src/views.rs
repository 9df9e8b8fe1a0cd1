//! Server-rendered HTML.

use nr_core::{CommunityArticle, NewsArticle, WeatherReport};
use std::fmt::Write as _;
use crate::flash::Flash;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let mut notices = String::new();
    for flash in flashes {
        let _ = write!(
            notices,
            r#"<div class="flash flash-{}">{}</div>"#,
            flash.level.as_str(),
            escape(&flash.message)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<header>
<a href="/">Newsroom</a>
<form action="/search" method="get">
<input type="text" name="query" placeholder="Search articles">
<button type="submit">Search</button>
</form>
</header>
<main>
{notices}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        notices = notices,
        body = body,
    )
}

fn article_item(article: &NewsArticle) -> String {
    let mut html = format!(
        r#"<li class="article">
<h3><a href="{link}">{headline}</a></h3>
<p>{summary}</p>
"#,
        link = escape(&article.link),
        headline = escape(&article.headline),
        summary = escape(&article.summary),
    );
    if let Some(ai_summary) = &article.ai_summary {
        let _ = writeln!(html, r#"<p class="ai-summary">AI summary: {}</p>"#, escape(ai_summary));
    }
    if let Some(sentiment) = article.sentiment {
        let _ = writeln!(html, r#"<p class="sentiment">Sentiment: {}</p>"#, sentiment);
    }
    let _ = write!(
        html,
        r#"<a href="/edit/{id}">Edit</a>
<form action="/delete/{id}" method="post"><button type="submit">Delete</button></form>
</li>
"#,
        id = article.id
    );
    html
}

fn community_item(article: &CommunityArticle) -> String {
    let byline = article.author.as_deref().unwrap_or(&article.username);
    let title = match &article.link {
        Some(link) => format!(r#"<a href="{}">{}</a>"#, escape(link), escape(&article.title)),
        None => escape(&article.title),
    };
    format!(
        r#"<li class="community-article">
<h3>{title}</h3>
<p class="byline">by {byline} (posted by {username})</p>
<p>{content}</p>
<a href="/community/{id}/edit">Edit</a>
<form action="/delete_community/{id}" method="post"><button type="submit">Delete</button></form>
</li>
"#,
        title = title,
        byline = escape(byline),
        username = escape(&article.username),
        content = escape(&article.content),
        id = article.id,
    )
}

fn weather_panel(weather: Option<&WeatherReport>) -> String {
    let details = match weather {
        Some(report) => format!(
            r#"<p>{location}: {temperature:.1}°C, feels like {feels_like:.1}°C, {condition}</p>
<p>Humidity {humidity}% · Wind {wind:.1} km/h · Updated {fetched_at}</p>"#,
            location = escape(&report.location),
            temperature = report.temperature,
            feels_like = report.feels_like,
            condition = report.condition.description(),
            humidity = report.humidity,
            wind = report.wind_speed,
            fetched_at = report.fetched_at.format("%Y-%m-%d %H:%M UTC"),
        ),
        None => "<p>No weather data yet.</p>".to_string(),
    };
    format!(
        r#"<section class="weather">
<h2>Weather</h2>
{details}
<form action="/update_weather" method="post"><button type="submit">Update weather</button></form>
</section>
"#
    )
}

const ADD_ARTICLE_FORM: &str = r#"<form action="/add" method="post">
<input type="text" name="headline" placeholder="Headline">
<textarea name="summary" placeholder="Summary"></textarea>
<input type="url" name="link" placeholder="Link">
<button type="submit">Add article</button>
</form>
"#;

const ADD_COMMUNITY_FORM: &str = r#"<form action="/add_community" method="post">
<input type="text" name="username" placeholder="Username">
<input type="text" name="title" placeholder="Title">
<textarea name="content" placeholder="Content"></textarea>
<input type="url" name="link" placeholder="Link (optional)">
<input type="text" name="author" placeholder="Author (optional)">
<button type="submit">Submit</button>
</form>
"#;

pub fn index_page(
    articles: &[NewsArticle],
    community: &[CommunityArticle],
    weather: Option<&WeatherReport>,
    flashes: &[Flash],
) -> String {
    let mut body = weather_panel(weather);

    body.push_str("<section class=\"news\">\n<h2>News Articles</h2>\n");
    body.push_str(ADD_ARTICLE_FORM);
    if articles.is_empty() {
        body.push_str("<p>No articles yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for article in articles {
            body.push_str(&article_item(article));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</section>\n");

    body.push_str("<section class=\"community\">\n<h2>Community Articles</h2>\n");
    body.push_str(ADD_COMMUNITY_FORM);
    body.push_str("<ul>\n");
    for article in community {
        body.push_str(&community_item(article));
    }
    body.push_str("</ul>\n</section>\n");

    layout("News Articles", flashes, &body)
}

pub fn search_page(query: &str, results: &[NewsArticle], flashes: &[Flash]) -> String {
    let mut body = format!("<h2>Search results for \"{}\"</h2>\n", escape(query));
    if !results.is_empty() {
        body.push_str("<ul>\n");
        for article in results {
            body.push_str(&article_item(article));
        }
        body.push_str("</ul>\n");
    }
    layout("Search", flashes, &body)
}

pub fn edit_article_page(article: &NewsArticle) -> String {
    let body = format!(
        r#"<h2>Edit article</h2>
<form action="/edit/{id}" method="post">
<input type="text" name="headline" value="{headline}">
<textarea name="summary">{summary}</textarea>
<input type="url" name="link" value="{link}">
<button type="submit">Save</button>
</form>
"#,
        id = article.id,
        headline = escape(&article.headline),
        summary = escape(&article.summary),
        link = escape(&article.link),
    );
    layout("Edit article", &[], &body)
}

pub fn edit_community_page(article: &CommunityArticle) -> String {
    let body = format!(
        r#"<h2>Edit community article</h2>
<form action="/edit_community/{id}" method="post">
<input type="text" name="username" value="{username}">
<input type="text" name="title" value="{title}">
<textarea name="content">{content}</textarea>
<input type="url" name="link" value="{link}">
<input type="text" name="author" value="{author}">
<button type="submit">Save</button>
</form>
"#,
        id = article.id,
        username = escape(&article.username),
        title = escape(&article.title),
        content = escape(&article.content),
        link = escape(article.link.as_deref().unwrap_or_default()),
        author = escape(article.author.as_deref().unwrap_or_default()),
    );
    layout("Edit community article", &[], &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!("<h2>{}</h2>\n<p>{}</p>\n", escape(title), escape(message));
    layout(title, &[], &body)
}
