pub fn active(couple_id: &str) -> String {
    format!("shark:active:{}", couple_id)
}

pub fn history(couple_id: &str, id: &str) -> String {
    format!("shark:history:{}:{}", couple_id, id)
}

pub fn history_prefix(couple_id: &str) -> String {
    format!("shark:history:{}:", couple_id)
}
