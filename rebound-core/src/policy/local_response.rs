use crate::conf::ConfigError;
use crate::conf::types::LocalResponseConfig;
use crate::ctx::{RequestCtx, ResponseCtx};
use crate::mutation::HeaderMutations;
use crate::policy::FilterAction;
use http::{HeaderValue, StatusCode, header};

/// Substitutes a synthetic response for the matched upstream response.
/// No replay is involved; the substitution happens in place.
pub struct LocalResponsePolicy {
    status_code: StatusCode,
    body: Option<String>,
    content_type: HeaderValue,
    response_mutations: HeaderMutations,
}

impl LocalResponsePolicy {
    pub fn from_config(cfg: &LocalResponseConfig) -> Result<Self, ConfigError> {
        let status_code = match cfg.status_code {
            Some(code) => StatusCode::from_u16(code)
                .map_err(|_| ConfigError::InvalidStatusCode { code })?,
            None => StatusCode::OK,
        };

        let content_type = match &cfg.content_type {
            Some(raw) => HeaderValue::from_str(raw).map_err(|_| {
                ConfigError::InvalidHeaderValue {
                    name: header::CONTENT_TYPE.to_string(),
                }
            })?,
            None => HeaderValue::from_static("text/plain"),
        };

        Ok(Self {
            status_code,
            body: cfg.body.clone(),
            content_type,
            response_mutations: HeaderMutations::from_config(&cfg.response_headers)?,
        })
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub(crate) fn on_response_headers(
        &self,
        response: &mut ResponseCtx,
        ctx: &mut RequestCtx,
    ) -> FilterAction {
        response.status = self.status_code;

        if let Some(body) = &self.body {
            response.body = body.clone().into_bytes();
            response
                .headers
                .insert(header::CONTENT_TYPE, self.content_type.clone());
            response
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        }

        self.response_mutations
            .evaluate(&mut response.headers, &ctx.stream_info);

        ctx.stream_info.set_response_code(self.status_code.as_u16());
        ctx.stream_info.set_local_reply_sent();

        FilterAction::Continue
    }
}
