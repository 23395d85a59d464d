use std::{env, error::Error, process::exit};

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use clap::Parser;
use time::Duration;

use spendwise::{UserID, create_cookie_key, set_auth_cookie};

/// A utility for issuing a session cookie for a user of spendwise.
///
/// The cookie is encrypted with the same `SECRET` as the server, so the
/// environment variable must match the one the server was started with.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The ID of the user to sign in as.
    #[arg(long, short)]
    user_id: i64,

    /// How long the session lasts before it must be used, in minutes.
    ///
    /// The server extends the session on every request.
    #[arg(long, default_value_t = 60)]
    minutes: i64,
}

/// Print a `Set-Cookie` header value for a new session.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let Ok(secret) = env::var("SECRET") else {
        eprintln!("The environment variable 'SECRET' must be set");
        exit(1);
    };

    if args.minutes <= 0 {
        eprintln!("The session duration must be at least one minute.");
        exit(1);
    }

    let jar = PrivateCookieJar::new(create_cookie_key(&secret));
    let jar = set_auth_cookie(
        jar,
        UserID::new(args.user_id),
        Duration::minutes(args.minutes),
    )?;

    let response = jar.into_response();
    let Some(cookie) = response.headers().get(SET_COOKIE) else {
        eprintln!("Could not create the session cookie.");
        exit(1);
    };

    println!("{}", cookie.to_str()?);

    Ok(())
}
