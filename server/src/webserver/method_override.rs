use rocket::{
    fairing::{Fairing, Info, Kind},
    http::Method,
    Data, Request,
};

/// Rocket only honors `_method` as the first field of a form. This also finds
/// it later in the body, as long as it falls within the peeked prefix.
pub struct MethodOverride;

const PEEK_LIMIT: usize = 512;

#[rocket::async_trait]
impl Fairing for MethodOverride {
    fn info(&self) -> Info {
        Info {
            name: "Form method override",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, data: &mut Data<'_>) {
        let is_form_post = request.method() == Method::Post
            && request
                .content_type()
                .map_or(false, |content_type| content_type.is_form());
        if !is_form_post {
            return;
        }

        if let Some(method) = overridden_method(data.peek(PEEK_LIMIT).await) {
            request.set_method(method);
        }
    }
}

fn overridden_method(body: &[u8]) -> Option<Method> {
    String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|field| field.split_once('='))
        .find(|(name, _)| *name == "_method")
        .and_then(|(_, value)| match value.trim().to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use rocket::http::Method;

    use super::overridden_method;

    #[test]
    fn finds_method_in_any_position() {
        assert_eq!(overridden_method(b"_method=PUT&name=A"), Some(Method::Put));
        assert_eq!(overridden_method(b"name=A&_method=delete"), Some(Method::Delete));
        assert_eq!(overridden_method(b"name=A&body=B"), None);
        assert_eq!(overridden_method(b"name=A&_method=GET"), None);
        assert_eq!(overridden_method(b"_method_x=PUT"), None);
    }
}
