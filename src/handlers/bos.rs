use actix_multipart::Multipart;
use actix_web::web::{Data, Json, Path, Payload, Query};
use actix_web::{HttpMessage, HttpRequest, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures_util::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};

use crate::core::authorizer::{ensure, Action, Authorizer, Object};
use crate::core::models::{
    bos::{BosMember, Create},
    recruiter::RecruiterInfo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::bos;
use crate::core::validate::Validate;
use crate::error::{Error, FieldError};
use crate::request::ListParams;
use crate::response::{Created, List, Success};
use crate::storer::FileStorer;

pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;
pub const MAX_JSON_SIZE: usize = 2 * 1024 * 1024;
pub const MAX_FIELD_SIZE: usize = 64 * 1024;
/// Whole multipart body: one photo plus the text fields.
pub const MAX_FORM_SIZE: usize = MAX_PHOTO_SIZE + MAX_JSON_SIZE;

const LIST_FIELDS: [&str; 2] = ["socials", "achievements"];

struct Photo {
    bytes: Bytes,
    extension: &'static str,
}

fn photo_extension(essence: &str) -> Option<&'static str> {
    match essence {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn photo_error(message: &str) -> Error {
    Error::Validation(vec![FieldError::new("photo", message)])
}

/// Multipart text fields land in a JSON object so both encodings share one
/// deserializer; list fields arrive JSON-stringified.
async fn read_multipart(mut payload: Multipart) -> Result<(Create, Option<Photo>), Error> {
    let mut fields = Map::new();
    let mut photo = None;
    let mut total = 0;
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_owned();
        let essence = field.content_type().map(|m| m.essence_str().to_owned());
        let mut content = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            total += chunk.len();
            if total > MAX_FORM_SIZE {
                return Err(Error::PayloadTooLarge(MAX_FORM_SIZE));
            }
            if name == "photo" && content.len() + chunk.len() > MAX_PHOTO_SIZE {
                return Err(photo_error("must be at most 5MB"));
            }
            if name != "photo" && content.len() + chunk.len() > MAX_FIELD_SIZE {
                return Err(Error::Validation(vec![FieldError::new(&name, "must be at most 64KB")]));
            }
            content.extend_from_slice(&chunk);
        }
        if name == "photo" {
            if content.is_empty() {
                continue;
            }
            let extension = essence.as_deref().and_then(photo_extension).ok_or_else(|| photo_error("must be a png, jpeg, webp or gif image"))?;
            photo = Some(Photo {
                bytes: content.freeze(),
                extension,
            });
            continue;
        }
        let text = String::from_utf8_lossy(&content).into_owned();
        let value = if LIST_FIELDS.contains(&name.as_str()) {
            if text.trim().is_empty() {
                Value::Array(Vec::new())
            } else {
                serde_json::from_str::<Value>(&text)?
            }
        } else {
            Value::String(text)
        };
        fields.insert(name, value);
    }
    Ok((serde_json::from_value(Value::Object(fields))?, photo))
}

async fn read_json(mut payload: Payload) -> Result<Create, Error> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(actix_web::Error::from)?;
        if body.len() + chunk.len() > MAX_JSON_SIZE {
            return Err(Error::PayloadTooLarge(MAX_JSON_SIZE));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Accepts `multipart/form-data` with an optional `photo` file, or plain JSON.
async fn read_form(req: &HttpRequest, payload: Payload) -> Result<(Create, Option<Photo>), Error> {
    if req.content_type() == "multipart/form-data" {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else {
        Ok((read_json(payload).await?, None))
    }
}

/// Validates first so a rejected form never leaves a file behind.
fn prepare<F: FileStorer>(mut data: Create, photo: Option<Photo>, storer: &F) -> Result<Create, Error> {
    data.validate()?;
    if let Some(photo) = photo {
        data.photo = Some(storer.write(&photo.bytes, photo.extension)?);
    }
    Ok(data)
}

pub async fn list<M, A>(Query(params): Query<ListParams>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<List<BosMember>>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Bos, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(bos::list(&mut db, &params.filter(), Some(params.pagination())).await?.into()))
}

pub async fn detail<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<BosMember>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Bos, Action::Read)?;
    let mut db = manager.db().await?;
    Ok(Json(bos::get(&mut db, &id).await?))
}

pub async fn create<M, A, F>(
    req: HttpRequest,
    payload: Payload,
    recruiter: RecruiterInfo,
    manager: Data<M>,
    authorizer: Data<A>,
    storer: Data<F>,
) -> Result<HttpResponse, Error>
where
    M: Manager,
    A: Authorizer,
    F: FileStorer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Bos, Action::Write)?;
    let (data, photo) = read_form(&req, payload).await?;
    let data = prepare(data, photo, storer.get_ref())?;
    let mut db = manager.db().await?;
    let id = bos::create(&mut db, data).await?;
    Ok(HttpResponse::Created().json(Created { id }))
}

pub async fn update<M, A, F>(
    id: Path<String>,
    req: HttpRequest,
    payload: Payload,
    recruiter: RecruiterInfo,
    manager: Data<M>,
    authorizer: Data<A>,
    storer: Data<F>,
) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
    F: FileStorer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Bos, Action::Write)?;
    let (data, photo) = read_form(&req, payload).await?;
    let data = prepare(data, photo, storer.get_ref())?;
    let mut db = manager.db().await?;
    bos::update(&mut db, &id, data).await?;
    Ok(Json(Success::ok()))
}

pub async fn delete<M, A>(id: Path<String>, recruiter: RecruiterInfo, manager: Data<M>, authorizer: Data<A>) -> Result<Json<Success>, Error>
where
    M: Manager,
    A: Authorizer,
{
    ensure(authorizer.get_ref(), &recruiter, Object::Bos, Action::Delete)?;
    let mut db = manager.db().await?;
    bos::delete(&mut db, &id).await?;
    log::info!("recruiter {} removed bos member {}", recruiter.id, id);
    Ok(Json(Success::ok()))
}
