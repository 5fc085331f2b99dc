use crate::modules::activity::service::Activity;

const SEED: &[(&str, &str, &str, u32, &[&str])] = &[
    (
        "Chess Club",
        "Learn strategies and compete in chess tournaments",
        "Fridays, 3:30 PM - 5:00 PM",
        12,
        &["michael@mergington.edu", "daniel@mergington.edu"],
    ),
    (
        "Programming Class",
        "Learn programming fundamentals and build software projects",
        "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        20,
        &["emma@mergington.edu", "sophia@mergington.edu"],
    ),
    (
        "Gym Class",
        "Physical education and sports activities",
        "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        30,
        &["john@mergington.edu", "olivia@mergington.edu"],
    ),
    (
        "Basketball",
        "Team sport focusing on basketball skills and competition",
        "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
        15,
        &[],
    ),
    (
        "Soccer",
        "Outdoor soccer matches and drills",
        "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
        22,
        &[],
    ),
    (
        "Drama Club",
        "Perform in theatrical productions and develop acting skills",
        "Wednesdays, 3:30 PM - 5:00 PM",
        25,
        &[],
    ),
    (
        "Visual Arts",
        "Explore painting, drawing, and sculpture",
        "Mondays and Fridays, 3:30 PM - 4:30 PM",
        18,
        &[],
    ),
    (
        "Debate Team",
        "Develop critical thinking and public speaking skills",
        "Thursdays, 3:30 PM - 5:00 PM",
        16,
        &[],
    ),
    (
        "Science Club",
        "Conduct experiments and explore scientific concepts",
        "Tuesdays, 3:30 PM - 4:30 PM",
        20,
        &[],
    ),
];

/// Activities the registry starts with.
pub(crate) fn activities() -> Vec<(String, Activity)> {
    SEED.iter()
        .map(|(name, description, schedule, max_participants, participants)| {
            (
                name.to_string(),
                Activity {
                    description: description.to_string(),
                    schedule: schedule.to_string(),
                    max_participants: *max_participants,
                    participants: participants.iter().map(|p| p.to_string()).collect(),
                },
            )
        })
        .collect()
}
