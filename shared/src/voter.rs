use serde::{Serialize, Deserialize};

/// Who is casting a vote, as far as the request tells us.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoterInfo {
    pub ip: String,
    pub user_agent: String,
}

pub const UNKNOWN_IP: &str = "0.0.0.0";

/// Picks the client address from proxy headers, falling back to the peer address.
pub fn resolve_client_ip(
    real_ip: Option<&str>,
    forwarded_for: Option<&str>,
    peer: Option<std::net::IpAddr>,
) -> String {
    let forwarded = forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    real_ip
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or(forwarded)
        .map(str::to_string)
        .or_else(|| peer.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_IP.to_string())
}

// Backend-specific Rocket implementation
#[cfg(feature = "backend")]
mod backend_impl {
    use super::*;
    use rocket::request::{FromRequest, Outcome};
    use rocket::Request;

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for VoterInfo {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            let headers = req.headers();
            let ip = resolve_client_ip(
                headers.get_one("X-Real-IP"),
                headers.get_one("X-Forwarded-For"),
                req.remote().map(|addr| addr.ip()),
            );
            let user_agent = headers.get_one("User-Agent").unwrap_or_default().to_string();

            Outcome::Success(VoterInfo { ip, user_agent })
        }
    }
}
