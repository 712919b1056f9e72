pub mod fanart;
pub mod http;

pub use fanart::{FanartClient, RemoteCatalog};
pub use http::{ByteStream, HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
