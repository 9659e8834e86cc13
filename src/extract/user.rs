//! Member profile rules (`/member/<id>`)

use scraper::{ElementRef, Html};
use url::Url;

use super::{main_content, parse_date, select_one, selector, text_of, ExtractContext, ExtractError};
use crate::record::{encode_data_url, User};

/// Profile fields read from the page, before the avatar is downloaded
struct ProfilePage {
    user_name: String,
    reg_time: chrono::DateTime<chrono::Utc>,
    url: Option<String>,
    about: Option<String>,
    avatar_url: Url,
}

pub(super) async fn extract(html: &str, ctx: &ExtractContext<'_>) -> Result<User, ExtractError> {
    // The parsed document is not Send, keep it out of the await below
    let profile = read_profile(html, ctx)?;

    let asset = ctx
        .fetcher
        .fetch_asset(&profile.avatar_url)
        .await
        .map_err(|source| ExtractError::Avatar {
            url: profile.avatar_url.to_string(),
            source,
        })?;

    Ok(User {
        user_id: ctx.id,
        user_name: profile.user_name,
        reg_time: profile.reg_time,
        avatar: encode_data_url(&asset.bytes, &asset.mime),
        url: profile.url,
        about: profile.about,
    })
}

fn read_profile(html: &str, ctx: &ExtractContext<'_>) -> Result<ProfilePage, ExtractError> {
    let document = Html::parse_document(html);
    let main = main_content(&document)?;

    let detail = select_one(main, ".member-detail")?;
    let rows: Vec<ElementRef<'_>> = detail.children().filter_map(ElementRef::wrap).collect();
    if rows.len() < 4 {
        return Err(ExtractError::MissingElement(
            ".member-detail > div (4 rows)".to_string(),
        ));
    }
    let (name_row, url_row, about_row) = (rows[0], rows[2], rows[3]);

    let user_name = text_of(select_one(name_row, "strong")?);
    if user_name.is_empty() {
        return Err(ExtractError::MissingValue("user name"));
    }
    let reg_time = parse_date(&text_of(name_row), ctx.offset)?;

    let url = url_row
        .select(&selector("a")?)
        .next()
        .map(text_of)
        .filter(|url| !url.is_empty());

    let about = Some(text_after_label(about_row)).filter(|about| !about.is_empty());

    let avatar_src = select_one(main, ".member-avatar > img")?
        .value()
        .attr("src")
        .ok_or(ExtractError::MissingValue("avatar src"))?;
    let avatar_url = ctx
        .page_url
        .join(avatar_src)
        .map_err(|_| ExtractError::MissingValue("resolvable avatar src"))?;

    Ok(ProfilePage {
        user_name,
        reg_time,
        url,
        about,
        avatar_url,
    })
}

/// Text of a row after its leading label element
fn text_after_label(row: ElementRef<'_>) -> String {
    let mut text = String::new();
    let mut past_label = false;
    for node in row.children() {
        if let Some(element) = ElementRef::wrap(node) {
            if !past_label {
                past_label = true;
                continue;
            }
            text.extend(element.text());
        } else if let Some(t) = node.value().as_text() {
            if past_label {
                text.push_str(t);
            }
        }
    }
    text.trim().to_string()
}
