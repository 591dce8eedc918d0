use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};

/// The representation a handler should answer with, picked from the
/// request's `Accept` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    // Order matters: on a tie the earlier format wins.
    const OFFERED: [ResponseFormat; 2] = [ResponseFormat::Html, ResponseFormat::Json];

    fn media_type(self) -> (&'static str, &'static str) {
        match self {
            ResponseFormat::Html => ("text", "html"),
            ResponseFormat::Json => ("application", "json"),
        }
    }

    /// How specifically `range` names this format, if at all.
    fn specificity(self, range: &str) -> Option<u8> {
        let (kind, subtype) = self.media_type();
        match range.split_once('/') {
            Some(("*", "*")) => Some(0),
            Some((range_kind, "*")) if range_kind == kind => Some(1),
            Some((range_kind, range_subtype)) if range_kind == kind && range_subtype == subtype => {
                Some(2)
            }
            _ => None,
        }
    }

    /// Returns `None` when neither HTML nor JSON is acceptable.
    pub fn negotiate(accept_header: Option<&str>) -> Option<Self> {
        let accept_header = match accept_header.map(str::trim) {
            None | Some("") => return Some(ResponseFormat::Html),
            Some(header) => header,
        };
        let ranges = parse_accept_header(accept_header);

        let mut best: Option<(ResponseFormat, f32, u8, usize)> = None;
        for format in Self::OFFERED.iter().copied() {
            // The most specific matching range decides this format's weight.
            let mut matched: Option<(u8, f32, usize)> = None;
            for (index, range) in ranges.iter().enumerate() {
                if let Some(specificity) = format.specificity(&range.media_type) {
                    if matched.map_or(true, |(best_specificity, _, _)| specificity > best_specificity) {
                        matched = Some((specificity, range.weight, index));
                    }
                }
            }

            let (specificity, weight, index) = match matched {
                Some(matched) if matched.1 > 0. => matched,
                _ => continue,
            };

            // Weight first, then the more specific range, then header order.
            let better = match best {
                None => true,
                Some((_, best_weight, best_specificity, best_index)) => {
                    weight > best_weight
                        || (weight == best_weight
                            && (specificity > best_specificity
                                || (specificity == best_specificity && index < best_index)))
                }
            };
            if better {
                best = Some((format, weight, specificity, index));
            }
        }

        best.map(|(format, ..)| format)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ResponseFormat {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match ResponseFormat::negotiate(request.headers().get_one("Accept")) {
            Some(format) => Outcome::Success(format),
            None => Outcome::Error((Status::NotAcceptable, ())),
        }
    }
}

#[derive(Debug, PartialEq)]
struct AcceptableType {
    media_type: String,
    weight: f32,
}

fn parse_accept_header(header: &str) -> Vec<AcceptableType> {
    let mut types = Vec::new();
    for possible_type in header.split(',') {
        let mut parts = possible_type.split(';');
        let media_type = match parts.next().map(str::trim) {
            Some(media_type) if !media_type.is_empty() => media_type.to_ascii_lowercase(),
            _ => continue,
        };
        let weight = parts
            .filter_map(|parameter| parameter.trim().strip_prefix("q="))
            .map(|qfactor| qfactor.trim().parse::<f32>().unwrap_or_default())
            .next()
            .unwrap_or(1.);

        types.push(AcceptableType { media_type, weight });
    }
    types
}

#[cfg(test)]
mod tests {
    use super::{parse_accept_header, AcceptableType, ResponseFormat};

    #[test]
    fn parse_accept_header_tests() {
        assert_eq!(
            parse_accept_header("application/json"),
            vec![AcceptableType {
                media_type: "application/json".to_owned(),
                weight: 1.,
            }]
        );

        assert_eq!(
            parse_accept_header("text/html;level=1;q=0.7, Application/JSON; charset=utf-8,*/*;q=0.1"),
            vec![
                AcceptableType {
                    media_type: "text/html".to_owned(),
                    weight: 0.7,
                },
                AcceptableType {
                    media_type: "application/json".to_owned(),
                    weight: 1.,
                },
                AcceptableType {
                    media_type: "*/*".to_owned(),
                    weight: 0.1,
                }
            ]
        );
    }

    #[test]
    fn negotiate_without_header() {
        assert_eq!(ResponseFormat::negotiate(None), Some(ResponseFormat::Html));
        assert_eq!(ResponseFormat::negotiate(Some("")), Some(ResponseFormat::Html));
        assert_eq!(ResponseFormat::negotiate(Some("*/*")), Some(ResponseFormat::Html));
    }

    #[test]
    fn negotiate_exact_types() {
        assert_eq!(
            ResponseFormat::negotiate(Some("application/json")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("text/html")),
            Some(ResponseFormat::Html)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("application/*")),
            Some(ResponseFormat::Json)
        );
    }

    #[test]
    fn negotiate_browser_header() {
        assert_eq!(
            ResponseFormat::negotiate(Some(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
            )),
            Some(ResponseFormat::Html)
        );
    }

    #[test]
    fn negotiate_weights_and_order() {
        assert_eq!(
            ResponseFormat::negotiate(Some("text/html;q=0.5, application/json")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("application/json, text/html")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("text/html, application/json")),
            Some(ResponseFormat::Html)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("*/*, text/html;q=0")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("*/*, application/json")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("text/*, application/json")),
            Some(ResponseFormat::Json)
        );
        assert_eq!(
            ResponseFormat::negotiate(Some("application/json;q=0.9, */*")),
            Some(ResponseFormat::Html)
        );
    }

    #[test]
    fn negotiate_nothing_acceptable() {
        assert_eq!(ResponseFormat::negotiate(Some("image/png")), None);
        assert_eq!(
            ResponseFormat::negotiate(Some("text/html;q=0, application/json;q=0")),
            None
        );
    }
}
