//! Local filename for a fetched file: Content-Disposition first, then URL path.

use url::Url;

const FALLBACK_NAME: &str = "shared-file.bin";
const NAME_MAX: usize = 255;

/// Filename from `Content-Disposition` (`filename*=UTF-8''...` preferred over `filename=`).
pub fn disposition_filename(header: &str) -> Option<String> {
    let mut plain: Option<String> = None;
    for param in header.split(';').map(str::trim) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name == "filename*" {
            let lower = value.to_ascii_lowercase();
            if let Some(encoded) = lower
                .starts_with("utf-8''")
                .then(|| &value["utf-8''".len()..])
            {
                let decoded = percent_encoding::percent_decode_str(encoded)
                    .decode_utf8()
                    .ok()
                    .map(|s| s.into_owned())
                    .filter(|s| !s.is_empty());
                if decoded.is_some() {
                    return decoded;
                }
            }
        } else if name == "filename" {
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .map(|v| v.replace("\\\"", "\"").replace("\\\\", "\\"))
                .unwrap_or_else(|| value.to_string());
            if !unquoted.is_empty() {
                plain = Some(unquoted);
            }
        }
    }
    plain
}

/// Last non-empty path segment, percent-decoded.
pub fn url_filename(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned();
    Some(decoded)
}

/// Replaces path separators and control characters and trims dots/spaces.
pub fn sanitize(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Safe local name for a download.
pub fn derive_filename(url: &Url, content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(disposition_filename)
        .or_else(|| url_filename(url))
        .map(|n| sanitize(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn disposition_variants() {
        assert_eq!(
            disposition_filename("attachment; filename=\"Sales 2024.xlsx\"").as_deref(),
            Some("Sales 2024.xlsx")
        );
        assert_eq!(
            disposition_filename("attachment; filename=plain.csv").as_deref(),
            Some("plain.csv")
        );
        assert_eq!(
            disposition_filename(
                "attachment; filename=\"fallback.xlsx\"; filename*=UTF-8''B%C3%A1o%20c%C3%A1o.xlsx"
            )
            .as_deref(),
            Some("Báo cáo.xlsx")
        );
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn url_segment_used_when_no_disposition() {
        assert_eq!(
            derive_filename(&url("https://cdn.example/a/b/data%20set.csv?x=1"), None),
            "data set.csv"
        );
    }

    #[test]
    fn download_endpoint_name_without_disposition() {
        assert_eq!(
            derive_filename(&url("https://onedrive.live.com/download?resid=A"), None),
            "download"
        );
    }

    #[test]
    fn unsafe_names_sanitized_or_replaced() {
        assert_eq!(
            derive_filename(&url("https://x.test/"), Some("attachment; filename=\"../../etc/passwd\"")),
            "_.._etc_passwd"
        );
        assert_eq!(derive_filename(&url("https://x.test/"), None), FALLBACK_NAME);
        assert_eq!(
            derive_filename(&url("https://x.test/"), Some("attachment; filename=\"..\"")),
            FALLBACK_NAME
        );
    }
}
