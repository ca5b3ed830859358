use askama::Template;

use crate::models::account::{CompleteProfileForm, ProfileForm, RegisterForm, SessionUser};
use super::{PageContext, PublicContext};

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PublicContext,
    pub error: Option<String>,
    pub email: String,
    pub google_client_id: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PublicContext,
    pub errors: Vec<String>,
    pub form: RegisterForm,
}

#[derive(Template)]
#[template(path = "auth/verify_otp.html")]
pub struct VerifyOtpTemplate {
    pub page: PublicContext,
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub page: PublicContext,
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub page: PublicContext,
    pub errors: Vec<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub user: SessionUser,
    pub form: ProfileForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "account/complete_profile.html")]
pub struct CompleteProfileTemplate {
    pub ctx: PageContext,
    pub form: CompleteProfileForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "account/pending.html")]
pub struct PendingTemplate {
    pub ctx: PageContext,
    pub user: SessionUser,
}
