mod origin;

pub use origin::CallbackUrl;
