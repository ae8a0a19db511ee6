//! JSON envelopes: `{ "data": ... }` for one record, `{ "data": [...], "meta": { "count": n } }`
//! for collections.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub meta: ListMeta,
}

#[derive(Serialize)]
pub struct ListMeta {
    pub count: usize,
}

/// One record with an explicit status (`CREATED` after inserts, `OK` otherwise).
pub fn respond<T: Serialize>(status: StatusCode, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (status, Json(Envelope { data }))
}

pub fn respond_list<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<ListEnvelope<T>>) {
    let meta = ListMeta { count: data.len() };
    (StatusCode::OK, Json(ListEnvelope { data, meta }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_counts_rows() {
        let (status, Json(body)) = respond_list(vec!["a", "b", "c"]);
        assert_eq!(status, StatusCode::OK);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["meta"]["count"], 3);
        assert_eq!(json["data"][2], "c");
    }

    #[test]
    fn single_envelope_has_no_meta() {
        let (status, Json(body)) = respond(StatusCode::CREATED, 7);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({ "data": 7 }));
    }
}
