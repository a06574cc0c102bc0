//! Canned replies used while the backend chat service is unreachable.

/// Shown when an assistant reply arrives with no text.
pub const DEFAULT_GREETING: &str = "Hello! I'm your BCYI x YorkU AI assistant. I can help you create \
newsletters, blog posts, donor emails, social media captions, and more!";

/// Appended when the chat proxy itself could not be reached.
pub const DEMO_MODE_NOTICE: &str = "Hello! I'm your BCYI x YorkU AI assistant. Currently in demo mode - \
please connect your backend API.";

/// Appended when resending an interrupted message fails.
pub const INTERRUPTED_NOTICE: &str = "Response was interrupted. Please try sending again.";

pub const NEWSLETTER_DEMO: &str = "Here's a draft newsletter for BCYI:

**Monthly Update - Youth Empowerment in Action**

Dear BCYI Community,

This month has been filled with incredible moments of growth and connection in our programs. Our Youth Hub welcomed 45 young people who participated in leadership workshops, art sessions, and community building activities.

Highlights:
• 3 new community partnerships established
• 28 youth completed our violence prevention program
• Upcoming: Annual Community Celebration on March 15th

Your support makes all of this possible. Together, we're building a stronger, more inclusive Black Creek community.

With gratitude,
The BCYI Team";

pub const BLOG_POST_DEMO: &str = "Here's a blog post draft about youth leadership:

**Young People at the Heart of Change**

At the Black Creek Youth Initiative, we believe that young people aren't just the leaders of tomorrow. They're the changemakers of today.

Through our programs, we've witnessed the incredible power of youth-led action. From organizing community events to advocating for human rights, our participants demonstrate that when given the right support and resources, young people can transform their communities.

This year alone, we've seen youth lead initiatives on racial justice, mental health awareness, and environmental sustainability. Their creativity, passion, and determination inspire us every day.

Join us in supporting these amazing young leaders as they continue to shape a brighter future for Black Creek and beyond.";

pub const DONOR_EMAIL_DEMO: &str = "Here's a thank you email for donors:

Subject: Your Impact on Young Lives - Thank You!

Dear [Donor Name],

On behalf of everyone at Black Creek Youth Initiative, I want to express our heartfelt gratitude for your generous donation of [Amount].

Your support directly enables us to:
• Provide safe, inclusive spaces for youth aged 12-29
• Deliver mental health support and violence prevention programs
• Offer homework help and educational resources
• Create opportunities for community engagement and leadership development

Last month alone, your contribution helped 85 young people access programs that are changing their lives. Stories like [Youth Story] remind us why this work matters.

Thank you for believing in our youth and investing in their future.

With deep appreciation,
[Your Name]
Executive Director, BCYI";

pub const SOCIAL_MEDIA_DEMO: &str = "Here are some social media caption ideas for BCYI:

Instagram Post 1:
🌟 Youth empowerment in action! Our weekly programs bring young people together to learn, grow, and build community. Every Tuesday & Thursday, 4:30-6 PM at the Community Room. All youth ages 12-29 welcome! 💪🏽✨ #BCYI #BlackCreekYouth #YouthLeadership #CommunityMatters

Instagram Post 2:
💬 \"This program isn't just about homework. It's about growing up together. It's a space where being real is valued more than being perfect.\" - Deandre, Program Participant

Your story matters. Your voice matters. Join us. #YouthVoices #Inclusion #BCYI

Instagram Post 3:
🎨 Creativity heals. Last week's art workshop was filled with color, expression, and powerful moments of self-discovery. Swipe to see what our youth created! → #ArtTherapy #YouthEmpowerment #BlackCreekStrong";

pub const GENERAL_DEMO: &str = "Hello! I'm your BCYI x YorkU AI assistant. I can help you create:

📧 **Newsletters** - Monthly updates and community announcements
✍️ **Blog Posts** - Stories about youth leadership and community impact
💝 **Donor Emails** - Thank you notes and impact reports
📱 **Social Media Content** - Engaging captions for Instagram, Facebook, and more

Just let me know what type of content you'd like to create, and I'll help you craft something that captures the spirit of BCYI and resonates with your audience!

What would you like to work on today?";

/// Canned text for a frontend content-type tag; unknown tags get the
/// general text.
pub fn demo_response(content_type: &str) -> &'static str {
    match content_type {
        "newsletter" => NEWSLETTER_DEMO,
        "blog-post" => BLOG_POST_DEMO,
        "donor-email" => DONOR_EMAIL_DEMO,
        "social-media" => SOCIAL_MEDIA_DEMO,
        _ => GENERAL_DEMO,
    }
}
