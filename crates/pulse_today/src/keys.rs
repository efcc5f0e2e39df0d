pub fn today(couple_id: &str, date: &str) -> String {
    format!("today:{couple_id}:{date}")
}

pub fn today_prefix(couple_id: &str) -> String {
    format!("today:{couple_id}:")
}
