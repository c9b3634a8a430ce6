use crate::extractor::JobDetails;

/// Render the broadcast message for one listing. Fixed template; every slot
/// is guaranteed renderable by the extractor's sentinel policy, including
/// the apply link.
pub fn broadcast_message(details: &JobDetails, apply_url: &str) -> String {
    format!(
        "🏢 Company: {company}\n\n\
         💼 Role: {role}\n\n\
         📍 Location: {location}\n\n\
         💰 Package: {package}\n\n\
         🔗 Apply Here:\n{link}\n\n\
         📋 Job Requirements:\n{requirements}",
        company = details.company_name,
        role = details.role,
        location = details.location,
        package = details.package_range,
        link = apply_url,
        requirements = details.requirements,
    )
}
