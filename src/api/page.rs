//! Server-rendered single page: one selection control, one action, two galleries.

use std::fmt::Write;

use crate::models::{RecommendationsResponse, RecommendedTitle};

/// Everything the page can show for one request
#[derive(Debug, Default)]
pub struct PageView<'a> {
    pub titles: &'a [String],
    pub selected: Option<&'a str>,
    pub chosen: Option<&'a RecommendedTitle>,
    pub recommendations: Option<&'a RecommendationsResponse>,
    pub error: Option<&'a str>,
}

pub fn render(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096 + view.titles.len() * 48);

    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>What anime to watch next?</title>\n<style>\n\
         body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; }\n\
         .gallery { display: grid; grid-template-columns: repeat(5, 1fr); gap: 1rem; }\n\
         .gallery figure { margin: 0; }\n\
         .gallery img { width: 100%; }\n\
         .error { color: #b00020; }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str("<h1>What anime to watch next?</h1>\n");
    html.push_str("<p>Anime Recommender System - content based + collaborative filtering</p>\n");

    render_form(&mut html, view);

    if let Some(error) = view.error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }

    let chosen = view
        .recommendations
        .map(|recs| &recs.chosen)
        .or(view.chosen);
    if let Some(chosen) = chosen {
        let _ = writeln!(
            html,
            "<p>You have chosen: {}</p>\n<img src=\"{}\" alt=\"{}\" width=\"50\">",
            escape_html(&chosen.name),
            escape_html(&chosen.poster_url),
            escape_html(&chosen.name)
        );
    }

    if let Some(recs) = view.recommendations {
        render_gallery(&mut html, "Similar animes:", &recs.similar);
        let heading = format!("Users who liked watching {} also liked:", recs.chosen.name);
        render_gallery(&mut html, &heading, &recs.users_also_liked);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, view: &PageView<'_>) {
    html.push_str("<form method=\"get\" action=\"/\">\n");
    html.push_str("<label for=\"title\">Choose your favourite anime!</label>\n");
    html.push_str("<select id=\"title\" name=\"title\" onchange=\"this.form.submit()\">\n");

    for title in view.titles {
        let selected = if view.selected == Some(title.as_str()) {
            " selected"
        } else {
            ""
        };
        let escaped = escape_html(title);
        let _ = writeln!(html, "<option value=\"{}\"{}>{}</option>", escaped, selected, escaped);
    }

    html.push_str("</select>\n");
    html.push_str("<button type=\"submit\" name=\"recommend\" value=\"true\">Recommend</button>\n");
    html.push_str("</form>\n");
}

fn render_gallery(html: &mut String, heading: &str, titles: &[RecommendedTitle]) {
    let _ = writeln!(html, "<h2>{}</h2>\n<div class=\"gallery\">", escape_html(heading));
    for title in titles {
        let name = escape_html(&title.name);
        let _ = writeln!(
            html,
            "<figure><figcaption>{}</figcaption><img src=\"{}\" alt=\"{}\"></figure>",
            name,
            escape_html(&title.poster_url),
            name
        );
    }
    html.push_str("</div>\n");
}

/// Escapes text for both element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
