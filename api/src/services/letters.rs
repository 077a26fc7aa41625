//! Template vocabularies for PD letters, reminder emails and sign-in
//! sheets, plus the printable page shell.

use db::models::{event, event_attendee, event_type, term};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub type Vars = Vec<(&'static str, String)>;

async fn event_type_name(db: &DatabaseConnection, event: &event::Model) -> Result<String, DbErr> {
    Ok(event_type::Entity::find_by_id(event.event_type_id)
        .one(db)
        .await?
        .map(|t| t.name)
        .unwrap_or_default())
}

async fn term_name(db: &DatabaseConnection, event: &event::Model) -> Result<String, DbErr> {
    Ok(term::Entity::find_by_id(event.term_id)
        .one(db)
        .await?
        .map(|t| t.name)
        .unwrap_or_default())
}

fn delivery_mode(event: &event::Model) -> String {
    event
        .delivery_mode
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_default()
}

/// Vocabulary for the PD letter template. The PD email shares it, with
/// `pd_letter_url` added on the email side only.
pub async fn pd_letter_vars(
    db: &DatabaseConnection,
    event: &event::Model,
    attendee: &event_attendee::Model,
    info: &event_attendee::AttendeeInfo,
) -> Result<Vars, DbErr> {
    Ok(vec![
        ("attendee_first_name", info.first_name.clone()),
        ("attendee_last_name", info.last_name.clone()),
        ("cohort", event.cohort_names(db).await?),
        ("term", term_name(db, event).await?),
        ("earned_pd_hour", attendee.pd_hour.to_string()),
        ("start_date_time", event.start_time_display()),
        ("end_date_time", event.end_time_display()),
        ("event_type", event_type_name(db, event).await?),
        ("pd_note", attendee.note.clone().unwrap_or_default()),
        ("delivery_mode", delivery_mode(event)),
        ("description", event.description.clone().unwrap_or_default()),
    ])
}

/// Vocabulary for reminder/guest emails sent to a specific attendee.
pub async fn guest_email_vars(
    db: &DatabaseConnection,
    event: &event::Model,
    attendee: &event_attendee::Model,
    info: &event_attendee::AttendeeInfo,
) -> Result<Vars, DbErr> {
    Ok(vec![
        ("attendee_first_name", info.first_name.clone()),
        ("attendee_last_name", info.last_name.clone()),
        ("event_term", term_name(db, event).await?),
        ("event_start_date_time", event.start_time_display()),
        ("event_end_date_time", event.end_time_display()),
        ("description", event.description.clone().unwrap_or_default()),
        ("pd_note", attendee.note.clone().unwrap_or_default()),
        ("pd_letter_url", attendee.pd_letter_url()),
    ])
}

/// Vocabulary for the sign-in sheet template. `guest_list` is the
/// alphabetized names rendered as an HTML list.
pub async fn signin_sheet_vars(
    db: &DatabaseConnection,
    event: &event::Model,
) -> Result<Vars, DbErr> {
    let names = event.guest_names(db).await?;
    Ok(vec![
        ("cohort", event.cohort_names(db).await?),
        ("term", term_name(db, event).await?),
        ("start_date_time", event.start_time_display()),
        ("end_date_time", event.end_time_display()),
        ("event_type", event_type_name(db, event).await?),
        ("delivery_mode", delivery_mode(event)),
        ("guest_list", guest_list_html(&names)),
    ])
}

/// Renders guest names as an HTML `<ul>` snippet.
pub fn guest_list_html(names: &[String]) -> String {
    let mut out = String::from("<ul>");
    for name in names {
        out.push_str("<li>");
        out.push_str(&html_escape(name));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Wraps rendered letter content in the printable page shell.
pub fn page_shell(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Georgia, 'Times New Roman', serif; color: #222; margin: 1in; }}
        h1, h2 {{ font-family: Arial, sans-serif; }}
        ul {{ line-height: 1.8; }}
    </style>
</head>
<body>
{}
</body>
</html>"#,
        body
    )
}

#[cfg(test)]
mod tests {
    use super::{guest_list_html, page_shell};

    #[test]
    fn guest_list_renders_escaped_items() {
        let html = guest_list_html(&["Lovelace, Ada".to_string(), "A & B High".to_string()]);
        assert_eq!(
            html,
            "<ul><li>Lovelace, Ada</li><li>A &amp; B High</li></ul>"
        );
    }

    #[test]
    fn page_shell_embeds_content() {
        let html = page_shell("<p>letter</p>");
        assert!(html.contains("<p>letter</p>"));
        assert!(html.contains("<!DOCTYPE html>"));
    }
}
