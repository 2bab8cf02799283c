use actix_web::web::{Data, Json};
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::Add;

use crate::core::models::user::Insert as UserInsert;
use crate::core::ports::repository::{TxStore, UserCommon};
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::middlewares::jwt::{gen_token, Claim, JWT_SECRET};
use crate::response::CreateResponse;

fn hash_password(pass: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(salt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
}

pub async fn signup(Json(Signup { email, password }): Json<Signup>, manager: Data<PgSqlxManager>) -> Result<Json<CreateResponse>, Error> {
    let mut tx = manager.tx().await?;
    let salt = random_salt();
    let id = UserCommon::insert(
        &mut tx,
        UserInsert {
            email,
            password: hash_password(&password, &salt),
            salt,
        },
    )
    .await?;
    tx.commit().await?;
    Ok(Json(CreateResponse::new(id)))
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub token: String,
}

pub async fn login(Json(Login { email, password }): Json<Login>, manager: Data<PgSqlxManager>) -> Result<Json<Token>, Error> {
    let mut db = manager.db().await?;
    let user = UserCommon::get_by_email(&mut db, &email)
        .await?
        .ok_or_else(|| Error::Unauthorized("invalid email or password".into()))?;
    if hash_password(&password, &user.salt) != user.password {
        return Err(Error::Unauthorized("invalid email or password".into()));
    }
    let claim = Claim {
        user: user.id.to_string(),
        exp: chrono::Utc::now().add(chrono::Duration::days(30)).timestamp(),
    };
    let secret = dotenv::var(JWT_SECRET)?;
    let token = gen_token(secret.as_bytes(), &claim)?;
    Ok(Json(Token { token }))
}
