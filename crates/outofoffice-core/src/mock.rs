//! Placeholder attendees shown for events that nobody has enrolled in yet.
//!
//! Placeholders carry no `userId`, which is how the refresh policy tells
//! them apart from real attendees and purges them once real enrollments
//! exist.

use outofoffice_shared::ids;
use outofoffice_store::Attendee;

struct Profile {
    name: &'static str,
    job: &'static str,
    company: &'static str,
    age: u32,
    bio: &'static str,
    photo: &'static str,
    interests: [&'static str; 3],
    mutual_connections: u32,
}

const PROFILES: [Profile; 7] = [
    Profile {
        name: "Sarah Johnson",
        job: "UX Designer",
        company: "Tech Innovations",
        age: 28,
        bio: "Passionate about creating user-centered designs. Love hiking and photography in my free time.",
        photo: "photo-1494790108755-2616b612b786",
        interests: ["Design", "Photography", "Hiking"],
        mutual_connections: 3,
    },
    Profile {
        name: "Michael Chen",
        job: "Software Engineer",
        company: "StartupCorp",
        age: 32,
        bio: "Full-stack developer who enjoys building scalable applications. Coffee enthusiast and weekend rock climber.",
        photo: "photo-1507003211169-0a1dd7228f2d",
        interests: ["Coding", "Coffee", "Rock Climbing"],
        mutual_connections: 5,
    },
    Profile {
        name: "Emily Davis",
        job: "Product Manager",
        company: "Digital Solutions",
        age: 29,
        bio: "Strategic thinker with a passion for innovative products. Love traveling and trying new cuisines.",
        photo: "photo-1438761681033-6461ffad8d80",
        interests: ["Product Strategy", "Travel", "Cooking"],
        mutual_connections: 2,
    },
    Profile {
        name: "David Rodriguez",
        job: "Data Scientist",
        company: "Analytics Pro",
        age: 35,
        bio: "Turning data into insights. Enjoy playing chess and reading sci-fi novels in my spare time.",
        photo: "photo-1472099645785-5658abf4ff4e",
        interests: ["Data Analysis", "Chess", "Sci-Fi"],
        mutual_connections: 1,
    },
    Profile {
        name: "Lisa Thompson",
        job: "Marketing Director",
        company: "Brand Masters",
        age: 31,
        bio: "Creative marketer who loves building brand stories. Yoga instructor and plant parent.",
        photo: "photo-1544005313-94ddf0286df2",
        interests: ["Marketing", "Yoga", "Plants"],
        mutual_connections: 4,
    },
    Profile {
        name: "James Wilson",
        job: "Frontend Developer",
        company: "Web Studio",
        age: 27,
        bio: "Building beautiful user interfaces. Love playing guitar and exploring new coffee shops.",
        photo: "photo-1500648767791-00dcc994a43e",
        interests: ["React", "Guitar", "Coffee"],
        mutual_connections: 2,
    },
    Profile {
        name: "Maria Garcia",
        job: "Business Analyst",
        company: "Consulting Group",
        age: 30,
        bio: "Analyzing business processes and finding solutions. Passionate about fitness and reading.",
        photo: "photo-1534528741775-53994a69daeb",
        interests: ["Business Analysis", "Fitness", "Reading"],
        mutual_connections: 3,
    },
];

/// The placeholder set for `event_id`, ids `"<eventId>_1"` to `"<eventId>_7"`.
pub fn placeholder_attendees(event_id: &str) -> Vec<Attendee> {
    PROFILES
        .iter()
        .enumerate()
        .map(|(i, p)| Attendee {
            id: ids::attendee_id(event_id, &(i + 1).to_string()),
            user_id: None,
            event_id: event_id.to_string(),
            name: p.name.to_string(),
            job: Some(p.job.to_string()),
            company: Some(p.company.to_string()),
            age: Some(p.age),
            bio: Some(p.bio.to_string()),
            image: Some(format!(
                "https://images.unsplash.com/{}?w=400&h=600&fit=crop",
                p.photo
            )),
            interests: p.interests.iter().map(|s| s.to_string()).collect(),
            mutual_connections: Some(p.mutual_connections),
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_have_no_user() {
        let attendees = placeholder_attendees("E1");
        assert_eq!(attendees.len(), 7);
        assert_eq!(attendees[0].id, "E1_1");
        assert_eq!(attendees[6].id, "E1_7");
        assert!(attendees.iter().all(|a| a.is_placeholder() && a.event_id == "E1"));
    }
}
