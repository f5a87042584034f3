#[macro_export]
macro_rules! server_config {
    ($name:expr, $pretty_name:expr, $client:expr, $ext:expr, $api_url:expr, $image_url:expr) => {
        ServerConfig {
            name: String::from($name),
            pretty_name: String::from($pretty_name),
            client_user_agent: String::from($client),
            extractor_user_agent: String::from($ext),
            api_url: String::from($api_url),
            image_url: String::from($image_url),
        }
    };
}
