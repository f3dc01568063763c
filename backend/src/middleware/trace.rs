//! Request correlation middleware.
//!
//! Adopts a well-formed inbound `trace-id` header or mints a new identifier,
//! runs the request inside both the task-local [`TraceId`] scope and a
//! `request` tracing span, then echoes the identifier on the response.
//!
//! Task-locals do not follow spawned tasks; wrap spawned work in
//! [`TraceId::scope`] to keep correlation.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Wrap an app to attach a trace identifier to every request.
///
/// ```
/// use actix_web::App;
/// use activities_backend::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn inbound_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header_value)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = inbound_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let started = Instant::now();
        let fut = {
            let _entered = span.enter();
            TraceId::scope(trace_id, self.service.call(req))
        };

        Box::pin(
            async move {
                let mut res = fut.await?;
                info!(
                    status = res.status().as_u16(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request completed"
                );
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(err) => error!(error = %err, "failed to encode trace-id header"),
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::Error as ApiError;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use serde_json::Value;

    const INBOUND: &str = "6f1c4c1e-58a4-4d0b-9f7e-0b9b3c1f2a11";

    fn header<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace-id header")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[actix_web::test]
    async fn handler_sees_echoed_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let echoed = header(&res);
        let body = test::read_body(res).await;
        assert_eq!(echoed.as_bytes(), body.as_ref());
    }

    #[rstest]
    #[case(Some(INBOUND), true)]
    #[case(Some("not-a-uuid"), false)]
    #[case(Some("00000000-0000-0000-0000-000000000000"), false)]
    #[case(None, false)]
    #[actix_web::test]
    async fn adopts_only_well_formed_inbound_ids(
        #[case] inbound: Option<&str>,
        #[case] adopted: bool,
    ) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = inbound {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }

        let res = test::call_service(&app, req.to_request()).await;

        let echoed = header(&res);
        assert_eq!(echoed == INBOUND, adopted);
        assert!(TraceId::from_header_value(&echoed).is_some());
    }

    #[actix_web::test]
    async fn error_body_carries_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { Err::<HttpResponse, _>(ApiError::internal("boom")) }),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header((TRACE_ID_HEADER, INBOUND))
                .to_request(),
        )
        .await;

        assert_eq!(header(&res), INBOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["traceId"], INBOUND);
        assert_eq!(body["message"], "Internal server error");
    }
}
