//! Article page rules (`/t/<id>`)

use scraper::{ElementRef, Html};

use super::{
    id_from_link, main_content, meta_content, parse_date, select_one, selector, text_of,
    without_badges, ExtractContext, ExtractError,
};
use crate::record::{Article, Comment};

pub(super) fn extract(html: &str, ctx: &ExtractContext<'_>) -> Result<Article, ExtractError> {
    let document = Html::parse_document(html);
    let main = main_content(&document)?;

    let category_link = select_one(main, ".fs14 > a:nth-child(2)")?;
    let category_id = category_link
        .value()
        .attr("href")
        .and_then(|href| id_from_link(href, "n"))
        .ok_or(ExtractError::MissingValue("category link"))?;

    let title = text_of(select_one(main, ".topic-title-main > h1")?);

    let meta = select_one(main, ".topic-title-date")?.inner_html();
    let author_id = id_from_link(&meta, "member").ok_or(ExtractError::MissingValue("author link"))?;
    let publish_time = parse_date(&meta, ctx.offset)?;

    let content = extract_content(select_one(main, ".topic-content")?)?;

    let tags = meta_content(&document, "keywords")?
        .map(|keywords| {
            keywords
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let comments = main
        .select(&selector(".main-box > .commont-item")?)
        .map(|item| extract_comment(item, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Article {
        article_id: ctx.id,
        category_id,
        author_id,
        publish_time,
        title,
        content,
        tags,
        comments,
    })
}

/// Joins the content blocks that precede the tag list (or the clearing `.c` div)
fn extract_content(container: ElementRef<'_>) -> Result<String, ExtractError> {
    let children: Vec<ElementRef<'_>> = container.children().filter_map(ElementRef::wrap).collect();

    let has_class = |el: &ElementRef<'_>, class: &str| el.value().classes().any(|c| c == class);
    let end = children
        .iter()
        .position(|el| has_class(el, "mytag"))
        .or_else(|| children.iter().position(|el| has_class(el, "c")))
        .unwrap_or(children.len());

    let blocks = children[..end]
        .iter()
        .map(|block| without_badges(*block, block.html()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(blocks.join("\n"))
}

fn extract_comment(item: ElementRef<'_>, ctx: &ExtractContext<'_>) -> Result<Comment, ExtractError> {
    // "commont" is the forum's own spelling
    let content_div = select_one(item, ".commont-content")?;
    let content = without_badges(content_div, content_div.inner_html())?
        .trim()
        .to_string();

    let meta = select_one(item, ".commont-data-date > .float-left")?;
    let author_id = select_one(meta, "a")?
        .value()
        .attr("href")
        .and_then(|href| id_from_link(href, "member"))
        .ok_or(ExtractError::MissingValue("comment author link"))?;
    let add_time = parse_date(&text_of(meta), ctx.offset)?;

    Ok(Comment {
        author_id,
        add_time,
        content,
    })
}
