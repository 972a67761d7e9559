use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Instant;

use crate::metrics::Metrics;

/// Counts every request that reaches the wrapped service (the static file server)
pub struct HitCounter {
    metrics: web::Data<Metrics>,
}

impl HitCounter {
    pub fn new(metrics: web::Data<Metrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for HitCounter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = HitCounterService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(HitCounterService {
            service: Rc::new(service),
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct HitCounterService<S> {
    service: Rc<S>,
    metrics: web::Data<Metrics>,
}

impl<S, B> Service<ServiceRequest> for HitCounterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        self.metrics.record_file_server_hit();

        let start_time = Instant::now();
        let path = req.path().to_string();
        let service = self.service.clone();

        Box::pin(async move {
            let res = service.call(req).await?;

            tracing::debug!(
                path = %path,
                status = res.status().as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Static file served"
            );

            Ok(res)
        })
    }
}
