use serde::Deserialize;

/// `geo_code` the primary puts in a 404 body when it does not hold the blob.
pub const FILE_NOT_FOUND_GEO_CODE: &str = "FILE_NOT_FOUND";

const NOT_FOUND: u16 = 404;

#[derive(Deserialize)]
struct GeoErrorBody {
    geo_code: Option<String>,
}

pub fn is_success(status: u16) -> bool { (200..300).contains(&status) }

/// Compares the mime type only, so `application/json; charset=utf-8` matches.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Distinguish "the primary legitimately lacks this blob" from any other
/// failed response. Only a JSON 404 carrying [`FILE_NOT_FOUND_GEO_CODE`]
/// qualifies; an unparsable body never does.
pub fn is_primary_missing_file(status: u16, content_type: Option<&str>, body: &[u8]) -> bool {
    if status != NOT_FOUND || !is_json_content_type(content_type) {
        return false;
    }

    serde_json::from_slice::<GeoErrorBody>(body)
        .ok()
        .and_then(|b| b.geo_code)
        .is_some_and(|code| code == FILE_NOT_FOUND_GEO_CODE)
}
