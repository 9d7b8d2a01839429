use crate::matching::domain::{eq_ignore_case, is_blank, CandidateLocation, Location};

pub fn location_score(posting: &Location, seeker: &CandidateLocation) -> f64 {
    if is_blank(&posting.city) || is_blank(&seeker.city) {
        return 1.0;
    }
    if eq_ignore_case(&posting.city, &seeker.city) {
        return 1.0;
    }

    let posting_city = posting.city.trim().to_lowercase();
    let seeker_city = seeker.city.trim().to_lowercase();
    if posting_city.contains(&seeker_city) || seeker_city.contains(&posting_city) {
        return 0.9;
    }

    if is_blank(&posting.country) || is_blank(&seeker.country) {
        return 0.5;
    }
    if eq_ignore_case(&posting.country, &seeker.country) {
        0.8
    } else {
        0.2
    }
}
