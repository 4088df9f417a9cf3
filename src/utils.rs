pub fn format_duration(duration: chrono::Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    let seconds = duration.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        let d = chrono::Duration::seconds(3 * 3600 + 7 * 60 + 5);
        assert_eq!(format_duration(d), "03:07:05");
        assert_eq!(format_duration(chrono::Duration::zero()), "00:00:00");
    }
}
