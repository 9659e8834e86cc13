//! Board listing rules (`/n/<id>`)

use scraper::Html;

use super::{main_content, meta_content, selector, text_of, ExtractContext, ExtractError};
use crate::record::Category;

pub(super) fn extract(html: &str, ctx: &ExtractContext<'_>) -> Result<Category, ExtractError> {
    let document = Html::parse_document(html);
    let main = main_content(&document)?;

    // The board name is only exposed through the keywords meta tag
    let name = meta_content(&document, "keywords")?
        .filter(|name| !name.is_empty())
        .ok_or(ExtractError::MissingValue("category name"))?;

    let description = main
        .select(&selector(".post-list.grey > p")?)
        .next()
        .map(text_of)
        .filter(|description| !description.is_empty());

    Ok(Category {
        category_id: ctx.id,
        name,
        description,
    })
}
