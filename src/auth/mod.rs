pub mod identity;
pub mod middleware;

pub use identity::{
    Identity, IdentityProvider, ProxyIdentityProvider, IDENTITY_EMAIL_HEADER,
    IDENTITY_FIRST_NAME_HEADER, IDENTITY_ID_HEADER, IDENTITY_IMAGE_URL_HEADER,
    IDENTITY_LAST_NAME_HEADER, IDENTITY_PROXY_SECRET_HEADER,
};
pub use middleware::CurrentIdentity;
