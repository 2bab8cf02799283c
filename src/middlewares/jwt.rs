use std::future::{ready, Future, Ready};
use std::pin::Pin;

use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, HttpMessage};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;

pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

pub fn gen_token(secret: &[u8], claim: &Claim) -> Result<String, crate::error::Error> {
    Ok(encode(&Header::default(), claim, &EncodingKey::from_secret(secret))?)
}

fn verify_token(secret: &[u8], token: &str) -> Result<Claim, crate::error::Error> {
    let data = decode::<Claim>(token, &DecodingKey::from_secret(secret), &Validation::default())?;
    Ok(data.claims)
}

pub struct Jwt {
    secret: Vec<u8>,
}

impl Jwt {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for Jwt
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JwtService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtService {
            secret: self.secret.clone(),
            next_service: service,
        }))
    }
}

pub struct JwtService<S> {
    secret: Vec<u8>,
    next_service: S,
}

impl<S> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match req.headers().get("Authorization").map(|h| h.to_str()) {
            None => return Box::pin(async move { Err(ErrorUnauthorized("no token in header")) }),
            Some(Err(e)) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Some(Ok(header)) => header.trim_start_matches("Bearer ").to_owned(),
        };
        match verify_token(&self.secret, &token) {
            Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
            Ok(claim) => match claim.user.parse::<i32>() {
                Err(e) => return Box::pin(async move { Err(ErrorUnauthorized(e)) }),
                Ok(id) => {
                    req.extensions_mut().insert(UserInfo { id });
                }
            },
        }
        let res_fut = self.next_service.call(req);
        Box::pin(async move { res_fut.await.map_err(|e| e.into()) })
    }
}
