//! Field checks shared by every form payload.
//!
//! A payload implements [`Validate`] by feeding its fields through a
//! [`Validator`]; all failures are collected so a form can show them inline
//! at once rather than one per round trip.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, FieldError};

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern"));

pub trait Validate {
    fn check(&self, v: &mut Validator);

    fn validate(&self) -> Result<(), Error> {
        let mut v = Validator::default();
        self.check(&mut v);
        v.finish()
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        }
        self
    }

    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.trim().chars().count() < min {
            self.fail(field, format!("must be at least {} characters", min));
        }
        self
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.fail(field, format!("must be at most {} characters", max));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            return self.fail(field, "is required");
        }
        if !EMAIL.is_match(value.trim()) {
            self.fail(field, "must be a valid email address");
        }
        self
    }

    pub fn phone(&mut self, field: &str, value: &str) -> &mut Self {
        let compact: String = value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if compact.is_empty() {
            return self.fail(field, "is required");
        }
        if !PHONE.is_match(&compact) {
            self.fail(field, "must be a valid phone number");
        }
        self
    }

    pub fn url(&mut self, field: &str, value: &str) -> &mut Self {
        match url::Url::parse(value.trim()) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            _ => {
                self.fail(field, "must be a valid http(s) URL");
            }
        }
        self
    }

    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.trim().is_empty() => self.url(field, v),
            _ => self,
        }
    }

    pub fn non_empty_list<T>(&mut self, field: &str, values: &[T]) -> &mut Self {
        if values.is_empty() {
            self.fail(field, "select at least one");
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.fail(field, format!("must be one of: {}", allowed.join(", ")));
        }
        self
    }

    pub fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(Error::Validation(self.errors))
    }
}
