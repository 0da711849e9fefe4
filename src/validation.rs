//! Schema checks applied to raw submissions before they reach a store.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{EventMode, NewBooking, NewEvent};

const MIN_TITLE_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{} field(s) failed validation", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field,
            message: message.into(),
        }])
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[cfg(test)]
    pub(crate) fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw text fields of a create-event form. Array fields carry encoded text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSubmission {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<String>,
    pub organizer: Option<String>,
    pub tags: Option<String>,
}

impl EventSubmission {
    /// Assigns a named form field. Returns false for names the form does not know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "slug" => &mut self.slug,
            "title" => &mut self.title,
            "description" => &mut self.description,
            "overview" => &mut self.overview,
            "image" => &mut self.image,
            "date" => &mut self.date,
            "time" => &mut self.time,
            "location" => &mut self.location,
            "venue" => &mut self.venue,
            "mode" => &mut self.mode,
            "audience" => &mut self.audience,
            "agenda" => &mut self.agenda,
            "organizer" => &mut self.organizer,
            "tags" => &mut self.tags,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<NewEvent, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = required(&mut errors, "title", &self.title);
        let description = required(&mut errors, "description", &self.description);
        let overview = required(&mut errors, "overview", &self.overview);
        let image = required(&mut errors, "image", &self.image);
        let location = required(&mut errors, "location", &self.location);
        let venue = required(&mut errors, "venue", &self.venue);
        let audience = required(&mut errors, "audience", &self.audience);
        let organizer = required(&mut errors, "organizer", &self.organizer);

        if let Some(title) = &title {
            if title.chars().count() < MIN_TITLE_LEN {
                errors.push("title", "Title must be at least 2 characters long");
            }
        }

        if let Some(image) = &image {
            if !is_image_reference(image) {
                errors.push("image", "Image must be an http(s) URL or an absolute path");
            }
        }

        let date = required(&mut errors, "date", &self.date).and_then(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| errors.push("date", "Date must use the YYYY-MM-DD format"))
                .ok()
        });

        let time = required(&mut errors, "time", &self.time).and_then(|raw| {
            parse_time(&raw)
                .or_else(|| {
                    errors.push("time", "Time must use the HH:MM format");
                    None
                })
        });

        let mode = required(&mut errors, "mode", &self.mode).and_then(|raw| {
            raw.parse::<EventMode>()
                .map_err(|_| errors.push("mode", "Mode must be one of online, offline or hybrid"))
                .ok()
        });

        let agenda = decode_list(
            &mut errors,
            "agenda",
            &self.agenda,
            '\n',
            "At least one agenda item is required",
        );
        let tags = decode_list(
            &mut errors,
            "tags",
            &self.tags,
            ',',
            "At least one tag is required",
        )
        .map(dedup_preserving_order);

        let slug = match self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) if is_valid_slug(slug) => Some(slug.to_string()),
            Some(_) => {
                errors.push(
                    "slug",
                    "Slug may only contain lowercase letters, digits and single hyphens",
                );
                None
            }
            None => title.as_deref().and_then(|title| {
                let slug = slugify(title);
                if slug.is_empty() {
                    errors.push(
                        "slug",
                        "Slug could not be derived from the title, please provide one",
                    );
                    None
                } else {
                    Some(slug)
                }
            }),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            slug, title, description, overview, image, date, time, location, venue, mode,
            audience, agenda, organizer, tags,
        ) {
            (
                Some(slug),
                Some(title),
                Some(description),
                Some(overview),
                Some(image),
                Some(date),
                Some(time),
                Some(location),
                Some(venue),
                Some(mode),
                Some(audience),
                Some(agenda),
                Some(organizer),
                Some(tags),
            ) => Ok(NewEvent {
                slug,
                title,
                description,
                overview,
                image,
                date,
                time,
                location,
                venue,
                mode,
                audience,
                agenda,
                organizer,
                tags,
            }),
            // Every None above recorded an error
            _ => Err(ValidationErrors::single("form", "Submission is incomplete")),
        }
    }
}

/// JSON body of a booking request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub event_id: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
}

impl BookingSubmission {
    pub fn validate(&self) -> Result<NewBooking, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let event_id = required(&mut errors, "eventId", &self.event_id).and_then(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|_| errors.push("eventId", "Event id must be a UUID"))
                .ok()
        });
        let slug = required(&mut errors, "slug", &self.slug);
        let email = required(&mut errors, "email", &self.email).and_then(|raw| {
            if is_plausible_email(&raw) {
                Some(raw)
            } else {
                errors.push("email", "Email address is invalid");
                None
            }
        });

        match (event_id, slug, email) {
            (Some(event_id), Some(slug), Some(email)) if errors.is_empty() => Ok(NewBooking {
                event_id,
                slug,
                email,
            }),
            _ => Err(errors),
        }
    }
}

/// Lowercases `title` and joins its alphanumeric runs with single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn is_valid_slug(slug: &str) -> bool {
    slugify(slug) == slug
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            errors.push(field, format!("{} is required", capitalize(field)));
            None
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Decodes an array field sent as text: a JSON array of strings, or else a
/// plain list split on `separator`. Blank items are dropped.
fn decode_list(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
    separator: char,
    empty_message: &str,
) -> Option<Vec<String>> {
    let raw = value.as_deref().map(str::trim).unwrap_or_default();

    // Text that merely starts with a bracket, like "[beta], rust", is a plain list
    let items: Vec<String> = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) if raw.starts_with('[') => items,
        _ => raw.split(separator).map(str::to_string).collect(),
    };

    let items: Vec<String> = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        errors.push(field, empty_message);
        return None;
    }
    Some(items)
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn is_image_reference(image: &str) -> bool {
    image.starts_with("https://")
        || image.starts_with("http://")
        || (image.starts_with('/') && image.len() > 1)
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
