//! Request builders for the admin routes.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use serde_json::{json, Value};
use uuid::Uuid;

use super::bearer;

pub fn image_part() -> Part {
    Part::bytes(Bytes::from_static(b"\x89PNG\r\n\x1a\nfake"))
        .file_name("cover.png")
        .mime_type("image/png")
}

pub fn audio_part() -> Part {
    Part::bytes(Bytes::from_static(b"ID3fake-mp3-body"))
        .file_name("song.mp3")
        .mime_type("audio/mpeg")
}

pub fn id_of(body: &Value) -> Uuid {
    Uuid::parse_str(body["id"].as_str().expect("Expected 'id' in response"))
        .expect("Invalid UUID in response")
}

fn join(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(",")
}

pub async fn create_genre(client: &TestServer, name: &str) -> Uuid {
    let response = client
        .post("/admin/genre")
        .add_header("Authorization", bearer())
        .json(&json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), 201);
    id_of(&response.json())
}

pub async fn create_artist(client: &TestServer, name: &str) -> Value {
    let form = MultipartForm::new()
        .add_text("name", name)
        .add_part("file", image_part());
    let response = client
        .post("/admin/artist")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

pub async fn create_album(
    client: &TestServer,
    name: &str,
    artists: &[Uuid],
    genres: &[Uuid],
) -> Value {
    let form = MultipartForm::new()
        .add_text("name", name)
        .add_text("artists", join(artists))
        .add_text("genres", join(genres))
        .add_part("file", image_part());
    let response = client
        .post("/admin/album")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

pub async fn create_track(client: &TestServer, name: &str, album: Uuid, artists: &[Uuid]) -> Value {
    let form = MultipartForm::new()
        .add_text("name", name)
        .add_text("album", album)
        .add_text("artists", join(artists))
        .add_part("file", audio_part());
    let response = client
        .post("/admin/track")
        .add_header("Authorization", bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}
