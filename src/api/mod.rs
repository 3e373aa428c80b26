mod gateway;

pub use gateway::{
    check_payload, classify_status, extract_content, extract_image_url, Gateway, GatewayClient,
    SceneImageRequest, ScriptRequest,
};
