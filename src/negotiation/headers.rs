use axum::http::{HeaderMap, HeaderName};

/// Values of a comma separated header such as `Accept` or `Accept-Encoding`.
///
/// Values from every header line are collected in order, lower-cased and
/// stripped of their parameters. Entries carrying `q=0` are refused by the
/// client and left out.
pub fn accepted_values(headers: &HeaderMap, name: &HeaderName) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|item| {
            let mut parts = item.split(';');
            let token = parts.next()?.trim();
            if token.is_empty() || parts.any(is_zero_quality) {
                return None;
            }
            Some(token.to_ascii_lowercase())
        })
        .collect()
}

fn is_zero_quality(parameter: &str) -> bool {
    let Some((key, value)) = parameter.split_once('=') else {
        return false;
    };

    key.trim().eq_ignore_ascii_case("q")
        && value
            .trim()
            .parse::<f32>()
            .is_ok_and(|quality| quality == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::http::header::{ACCEPT, ACCEPT_ENCODING};

    #[test]
    fn test_splits_and_trims() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate,  BR"));

        assert_eq!(
            accepted_values(&headers, &ACCEPT_ENCODING),
            vec!["gzip", "deflate", "br"]
        );
    }

    #[test]
    fn test_strips_parameters_and_refused_entries() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("image/avif;q=0, image/webp;q=0.9, */*;q=0.8"),
        );

        assert_eq!(accepted_values(&headers, &ACCEPT), vec!["image/webp", "*/*"]);
    }

    #[test]
    fn test_multiple_header_lines() {
        let mut headers = HeaderMap::new();
        headers.append(ACCEPT, HeaderValue::from_static("image/avif"));
        headers.append(ACCEPT, HeaderValue::from_static("image/webp,,"));

        assert_eq!(
            accepted_values(&headers, &ACCEPT),
            vec!["image/avif", "image/webp"]
        );
    }

    #[test]
    fn test_missing_header() {
        assert!(accepted_values(&HeaderMap::new(), &ACCEPT).is_empty());
    }
}
