//! Prompt templates for the two extraction calls.
//!
//! The heuristics live in the prompt text: which links count as application
//! links, how the company name is read off the title, and the exact output
//! shapes the parsers in this module's siblings expect.

/// Prompt for pulling the application link out of a video description.
pub fn application_link(title: &str, description: &str) -> String {
    format!(
        r#"You are a helpful assistant that extracts job application links from video descriptions.

TASK:
- Return the FIRST valid job application link.
- Output MUST be the bare URL and nothing else.
- If no job application link is found, return exactly:
No link found

RULES:
1. Prefer a URL explicitly labeled with "Link:".
2. If no "Link:" label exists, use the company name from the TITLE to match a relevant URL.
3. Ignore unrelated links: mentoring/scheduling pages (Topmate), chat groups (WhatsApp), course sites (Educative, GFG), Google Docs, Reddit and similar community links.

EXAMPLE:

Title:
Mhtechin Hiring Interns - Apply Now | Open to All

Description:
https://www.linkedin.com/posts/mhtechin-india_hiring-internship-activity-7406640651783688192-APkn

Output:
https://www.linkedin.com/posts/mhtechin-india_hiring-internship-activity-7406640651783688192-APkn

------------------
ACTUAL INPUT:

Title:
{title}

Description:
{description}
"#
    )
}

/// Prompt for extracting structured job details from a transcript.
pub fn job_details(title: &str, transcript: &str) -> String {
    format!(
        r#"You are a helpful assistant that extracts job details from video transcripts.

TASK:
- Extract the following details:
1. Company Name (it is usually in the video title, e.g. "Mhtechin Hiring Interns - Apply Now" -> Company Name is "Mhtechin")
2. Role (if it is an internship, append "(Internship)", e.g. Software Engineer (Internship))
3. Location
4. Job Requirements (brief summary of the skills, qualifications and experience required. Format as a plain text list using "•" as the bullet, one item per line separated by newlines. Do NOT use HTML tags such as <ul> or <li>. If the role is an internship, include the internship duration.)
5. Package Range (if mentioned; otherwise "Not specified")
- Output MUST be exactly this JSON and nothing else:
{{
    "company_name": "<Company Name>",
    "role": "<Role>",
    "location": "<Location>",
    "job_requirements": "<Job Requirements>",
    "package_range": "<Package Range>"
}}
- If any detail is not mentioned, use "Not specified" for that field.

Title:
{title}

Transcript:
{transcript}
"#
    )
}
