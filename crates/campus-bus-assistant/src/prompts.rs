use campus_bus_domain::model::Route;

/// System instruction listing the current route table
pub fn build_system_instruction(routes: &[Route]) -> String {
    let mut lines = vec![
        "You are the campus transport assistant.".to_string(),
        "Riders ask about bus routes, schedules, and general transport information.".to_string(),
        "Current routes:".to_string(),
    ];
    for route in routes {
        lines.push(format!(
            "- {} (departs {}): {}",
            route.name,
            route.start_time,
            route.stops.join(" -> ")
        ));
    }
    lines.push(
        "Be polite and concise. You do not know real-time bus positions; \
         point riders to the live map for those."
            .to_string(),
    );
    lines.join("\n")
}
