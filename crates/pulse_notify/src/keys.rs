pub fn notification(id: &str) -> String {
    format!("notification:{id}")
}

pub fn receiver_index(receiver_id: &str, id: &str) -> String {
    format!("notification:user:{receiver_id}:{id}")
}

pub fn receiver_prefix(receiver_id: &str) -> String {
    format!("notification:user:{receiver_id}:")
}
