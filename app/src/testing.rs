//! View test harness
//!
//! [`ViewTestCase`] gives each test a migrated in-memory database, the
//! application router behind a [`TestClient`] and a fixed set of
//! fixtures: a superuser, a regular user in a group, and a role bound to
//! that group. Permissions and object access are granted to the role.
//!
//! ```rust,ignore
//! let mut case = ViewTestCase::set_up().await?;
//! case.grant_permission(&PERMISSION_WORKFLOW_VIEW).await?;
//! case.login_user().await;
//! case.get("document_states:workflow_template_list", &[])?.send().await.assert_ok();
//! case.tear_down().await?;
//! ```

use kit::testing::{TestClient, TestDatabase, TestRequest};
use kit::{
    Config, DbConnection, FormData, FrameworkError, Route, RouteError, SessionConfig,
    SessionStore, View,
};
use sea_orm::{ActiveModelTrait, DbErr, Set};
use serde_json::{json, Value};

use crate::acls::{self, AclObject};
use crate::config::AuthConfig;
use crate::migrations::Migrator;
use crate::models::{groups, roles, users};
use crate::permissions::Permission;
use crate::{auth, bootstrap, routes};

pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "admin-password";
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_USER_USERNAME: &str = "test_user";
pub const TEST_USER_PASSWORD: &str = "test-user-password";
pub const TEST_USER_EMAIL: &str = "test_user@example.com";
pub const TEST_GROUP_NAME: &str = "test_group";
pub const TEST_ROLE_LABEL: &str = "test role";
pub const TEST_VIEW_NAME: &str = "test-view";
pub const TEST_VIEW_URL: &str = "/test-view/";

/// Cheapest bcrypt cost, fixtures only
const TEST_HASH_COST: u32 = 4;

pub struct ViewTestCase {
    pub client: TestClient,
    pub admin_user: users::Model,
    pub test_user: users::Model,
    pub test_group: groups::Model,
    pub test_role: roles::Model,
    db: DbConnection,
    has_test_view: bool,
}

impl ViewTestCase {
    pub async fn set_up() -> Result<Self, FrameworkError> {
        Config::register(AuthConfig {
            hash_cost: TEST_HASH_COST,
            ..AuthConfig::from_env()
        });

        let db = TestDatabase::fresh::<Migrator>().await?.into_conn();
        bootstrap::register(db.clone()).await?;

        let admin_user =
            auth::create_user(&db, TEST_ADMIN_USERNAME, TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD, true)
                .await?;
        let test_user =
            auth::create_user(&db, TEST_USER_USERNAME, TEST_USER_EMAIL, TEST_USER_PASSWORD, false)
                .await?;

        let test_group = groups::ActiveModel {
            name: Set(TEST_GROUP_NAME.to_string()),
            ..Default::default()
        }
        .insert(&*db)
        .await?;
        test_group.add_user(&db, test_user.id).await?;

        let test_role = roles::ActiveModel {
            label: Set(TEST_ROLE_LABEL.to_string()),
            ..Default::default()
        }
        .insert(&*db)
        .await?;
        test_role.add_group(&db, test_group.id).await?;

        let sessions = SessionStore::new(SessionConfig::from_env());
        let client = TestClient::new(routes::build(db.clone(), sessions));

        Ok(Self {
            client,
            admin_user,
            test_user,
            test_group,
            test_role,
            db,
            has_test_view: false,
        })
    }

    pub fn db(&self) -> &DbConnection {
        &self.db
    }

    /// Log out and drop the test view, leaving the route table as built
    pub async fn tear_down(&mut self) -> Result<(), RouteError> {
        self.logout().await;
        if self.has_test_view {
            self.client.router_mut().remove_route(0)?;
            self.has_test_view = false;
        }
        Ok(())
    }

    /// Serve `object` at [`TEST_VIEW_URL`], ahead of every other route
    pub fn add_test_view(&mut self, object: Value) -> Result<(), RouteError> {
        let route = Route::get(TEST_VIEW_URL, move |_req| {
            let context = json!({
                "object": object.clone(),
                "resolved_object": object.clone(),
            });
            async move { View::template("{{ object }}", context) }
        })
        .name(TEST_VIEW_NAME);

        self.client.router_mut().insert_route(0, route)?;
        self.has_test_view = true;
        Ok(())
    }

    /// Context of the test view merged with the request that rendered it
    pub async fn get_test_view(&self) -> Value {
        let response = self.client.get(TEST_VIEW_URL).send().await;
        let mut context = response.context().cloned().unwrap_or_else(|| json!({}));
        context["request"] = json!({
            "method": "GET",
            "path": response.path(),
            "status": response.status(),
        });
        context
    }

    /// GET the named route
    pub fn get(&self, viewname: &str, args: &[(&str, &str)]) -> Result<TestRequest<'_>, RouteError> {
        Ok(self.client.get(self.client.reverse(viewname, args)?))
    }

    /// POST to the named route
    pub fn post(&self, viewname: &str, args: &[(&str, &str)]) -> Result<TestRequest<'_>, RouteError> {
        Ok(self.client.post(self.client.reverse(viewname, args)?))
    }

    /// Grant `permission` on `object` to the test role
    pub async fn grant_access<T: AclObject>(
        &self,
        permission: &Permission,
        object: &T,
    ) -> Result<(), DbErr> {
        acls::grant(&self.db, self.test_role.id, permission, object.acl_ref()).await
    }

    /// Grant `permission` globally to the test role
    pub async fn grant_permission(&self, permission: &Permission) -> Result<(), DbErr> {
        let stored = permission.stored(&self.db).await?;
        self.test_role.grant(&self.db, stored.id).await
    }

    /// Log in through the login view; `true` when a session was started
    pub async fn login(&self, username: &str, password: &str) -> bool {
        let Ok(url) = self.client.reverse("authentication:login_view", &[]) else {
            return false;
        };
        let response = self
            .client
            .post(url)
            .form(FormData::from_pairs([("username", username), ("password", password)]))
            .send()
            .await;
        response.status() == 302
    }

    pub async fn login_user(&self) -> bool {
        self.login(TEST_USER_USERNAME, TEST_USER_PASSWORD).await
    }

    pub async fn login_admin_user(&self) -> bool {
        self.login(TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD).await
    }

    pub async fn logout(&self) {
        if let Ok(url) = self.client.reverse("authentication:logout_view", &[]) {
            self.client.post(url).send().await;
        }
        self.client.clear_cookies();
    }
}
