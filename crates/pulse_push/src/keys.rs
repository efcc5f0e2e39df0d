pub fn device(user_id: &str, device_id: &str) -> String {
    format!("push:device:{}:{}", user_id, device_id)
}

pub fn devices_prefix(user_id: &str) -> String {
    format!("push:device:{}:", user_id)
}
