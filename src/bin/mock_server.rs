//! Mock chat server + WebDriver endpoint for integration testing
//!
//! Serves just enough of the fixture REST API and the W3C WebDriver
//! protocol for the suite to run end-to-end without a real server or
//! browser. World state lives in memory; the "DOM" is a small model of
//! the channel discovery UI derived from that state.
//!
//! Prints `listening at: <addr>` on startup so callers can parse the
//! bound address.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const ARCHIVED_BANNER: &str =
    "You are viewing an archived channel. New messages cannot be posted.";

#[tokio::main]
async fn main() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no local address");
    println!("listening at: {addr}");

    let world = Arc::new(Mutex::new(World::new()));

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => continue,
        };
        let world = world.clone();
        tokio::spawn(async move {
            let _ = handle_connection(stream, world).await;
        });
    }
}

// === HTTP plumbing ===

struct HttpRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Value,
}

struct HttpResponse {
    status: u16,
    reason: &'static str,
    body: Value,
    extra_headers: Vec<(String, String)>,
}

impl HttpResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body,
            extra_headers: Vec::new(),
        }
    }

    fn created(body: Value) -> Self {
        Self {
            status: 201,
            reason: "Created",
            body,
            extra_headers: Vec::new(),
        }
    }

    fn api_error(status: u16, reason: &'static str, message: &str) -> Self {
        Self {
            status,
            reason,
            body: json!({ "message": message }),
            extra_headers: Vec::new(),
        }
    }

    fn wd_ok(value: Value) -> Self {
        Self::ok(json!({ "value": value }))
    }

    fn wd_error(status: u16, reason: &'static str, error: &str, message: &str) -> Self {
        Self {
            status,
            reason,
            body: json!({ "value": { "error": error, "message": message } }),
            extra_headers: Vec::new(),
        }
    }

    fn no_such_element(selector: &str) -> Self {
        Self::wd_error(
            404,
            "Not Found",
            "no such element",
            &format!("no element matches '{selector}'"),
        )
    }
}

async fn handle_connection(mut stream: TcpStream, world: Arc<Mutex<World>>) -> std::io::Result<()> {
    loop {
        let request = match read_request(&mut stream).await? {
            Some(req) => req,
            None => return Ok(()),
        };

        let response = {
            let mut world = world.lock().expect("world poisoned");
            world.route(&request)
        };

        write_response(&mut stream, &response).await?;
    }
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<Option<HttpRequest>> {
    let mut buf: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_subslice(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let header_text = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = header_text.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body_bytes = buf[header_end + 4..].to_vec();
    while body_bytes.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(None);
        }
        body_bytes.extend_from_slice(&chunk[..n]);
    }
    body_bytes.truncate(content_length);

    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    Ok(Some(HttpRequest {
        method,
        path,
        headers,
        body,
    }))
}

async fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> std::io::Result<()> {
    let body = serde_json::to_vec(&response.body).unwrap_or_default();
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n",
        response.status,
        response.reason,
        body.len()
    );
    for (name, value) in &response.extra_headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&body).await?;
    stream.flush().await
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// === World state ===

#[derive(Clone)]
struct UserRec {
    id: String,
    username: String,
    password: String,
    email: String,
}

#[derive(Clone)]
struct TeamRec {
    id: String,
    name: String,
    display_name: String,
}

#[derive(Clone)]
struct ChannelRec {
    id: String,
    name: String,
    display_name: String,
    team_id: String,
    archived: bool,
    members: Vec<String>,
}

/// Virtual page of one browser session
#[derive(Default)]
struct PageState {
    origin: String,
    path: String,
    user: Option<String>,
    team: Option<String>,
    channel: Option<String>,
    modal_open: bool,
    dropdown_expanded: bool,
    archived_mode: bool,
    search: String,
    menu_open: bool,
    confirm_open: bool,
}

struct World {
    next_id: u64,
    flag_archived: bool,
    users: HashMap<String, UserRec>,
    tokens: HashMap<String, String>,
    teams: HashMap<String, TeamRec>,
    channels: HashMap<String, ChannelRec>,
    sessions: HashMap<String, PageState>,
}

impl World {
    fn new() -> Self {
        let mut users = HashMap::new();
        users.insert(
            "uid-admin".to_string(),
            UserRec {
                id: "uid-admin".to_string(),
                username: "admin".to_string(),
                password: "admin".to_string(),
                email: "admin@suite.test".to_string(),
            },
        );
        Self {
            next_id: 1,
            flag_archived: false,
            users,
            tokens: HashMap::new(),
            teams: HashMap::new(),
            channels: HashMap::new(),
            sessions: HashMap::new(),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}-{id}")
    }

    fn route(&mut self, req: &HttpRequest) -> HttpResponse {
        let segments: Vec<String> = req
            .path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let segs: Vec<&str> = segments.iter().map(String::as_str).collect();

        match (req.method.as_str(), segs.as_slice()) {
            // --- fixture REST API ---
            ("GET", ["api", "v4", "system", "ping"]) => HttpResponse::ok(json!({"status": "OK"})),
            ("POST", ["api", "v4", "users", "login"]) => self.login(&req.body),
            ("POST", ["api", "v4", "users"]) => self.create_user(&req.body),
            ("POST", ["api", "v4", "teams"]) => self.create_team(&req.body),
            ("POST", ["api", "v4", "teams", team_id, "members"]) => {
                self.add_team_member(&team_id.to_string(), &req.body)
            }
            ("POST", ["api", "v4", "channels"]) => self.create_channel(req),
            ("PUT", ["api", "v4", "config", "patch"]) => self.patch_config(&req.body),

            // --- WebDriver protocol ---
            ("GET", ["status"]) => {
                HttpResponse::wd_ok(json!({"ready": true, "message": "mock ready"}))
            }
            ("POST", ["session"]) => self.new_session(),
            ("DELETE", ["session", sid]) => {
                self.sessions.remove(*sid);
                HttpResponse::wd_ok(Value::Null)
            }
            ("POST", ["session", sid, "url"]) => self.navigate(&sid.to_string(), &req.body),
            ("GET", ["session", sid, "url"]) => self.current_url(sid),
            ("POST", ["session", sid, "cookie"]) => self.add_cookie(&sid.to_string(), &req.body),
            ("DELETE", ["session", sid, "cookie"]) => {
                if let Some(page) = self.sessions.get_mut(*sid) {
                    page.user = None;
                }
                HttpResponse::wd_ok(Value::Null)
            }
            ("POST", ["session", sid, "element"]) => self.find_element(&sid.to_string(), &req.body),
            ("POST", ["session", sid, "elements"]) => {
                self.find_elements(&sid.to_string(), &req.body)
            }
            ("POST", ["session", sid, "element", eid, "click"]) => {
                self.click(&sid.to_string(), &eid.to_string())
            }
            ("POST", ["session", sid, "element", eid, "value"]) => {
                self.send_keys(&sid.to_string(), &eid.to_string(), &req.body)
            }
            ("POST", ["session", sid, "element", eid, "clear"]) => {
                self.clear(&sid.to_string(), &eid.to_string())
            }
            ("GET", ["session", sid, "element", eid, "text"]) => self.element_text(sid, eid),
            ("GET", ["session", sid, "element", _eid, "displayed"]) => {
                HttpResponse::wd_ok(json!(true))
            }

            _ => HttpResponse::api_error(404, "Not Found", "unknown route"),
        }
    }

    // --- REST handlers ---

    fn login(&mut self, body: &Value) -> HttpResponse {
        let login_id = body["login_id"].as_str().unwrap_or_default();
        let password = body["password"].as_str().unwrap_or_default();

        let user = self
            .users
            .values()
            .find(|u| u.username == login_id && u.password == password)
            .cloned();

        match user {
            Some(user) => {
                let token = self.next_id("token");
                self.tokens.insert(token.clone(), user.id.clone());
                let mut resp = HttpResponse::ok(user_json(&user));
                resp.extra_headers.push(("Token".to_string(), token));
                resp
            }
            None => HttpResponse::api_error(401, "Unauthorized", "invalid credentials"),
        }
    }

    fn create_user(&mut self, body: &Value) -> HttpResponse {
        let username = body["username"].as_str().unwrap_or_default().to_string();
        let password = body["password"].as_str().unwrap_or_default().to_string();
        let email = body["email"].as_str().unwrap_or_default().to_string();
        if username.is_empty() || password.is_empty() {
            return HttpResponse::api_error(400, "Bad Request", "username and password required");
        }

        let id = self.next_id("uid");
        let user = UserRec {
            id: id.clone(),
            username,
            password,
            email,
        };
        let response = HttpResponse::created(user_json(&user));
        self.users.insert(id, user);
        response
    }

    fn create_team(&mut self, body: &Value) -> HttpResponse {
        let name = body["name"].as_str().unwrap_or_default().to_string();
        let display_name = body["display_name"].as_str().unwrap_or_default().to_string();
        if name.is_empty() {
            return HttpResponse::api_error(400, "Bad Request", "team name required");
        }

        let id = self.next_id("tid");
        let team = TeamRec {
            id: id.clone(),
            name,
            display_name,
        };

        // Every team starts with its default channel
        let square_id = self.next_id("cid");
        self.channels.insert(
            square_id.clone(),
            ChannelRec {
                id: square_id,
                name: "town-square".to_string(),
                display_name: "Town Square".to_string(),
                team_id: id.clone(),
                archived: false,
                members: Vec::new(),
            },
        );

        let response = HttpResponse::created(team_json(&team));
        self.teams.insert(id, team);
        response
    }

    fn add_team_member(&mut self, team_id: &str, body: &Value) -> HttpResponse {
        let user_id = body["user_id"].as_str().unwrap_or_default().to_string();
        if !self.teams.contains_key(team_id) {
            return HttpResponse::api_error(404, "Not Found", "team not found");
        }
        if !self.users.contains_key(&user_id) {
            return HttpResponse::api_error(404, "Not Found", "user not found");
        }

        // Team membership implies the default channel
        for channel in self.channels.values_mut() {
            if channel.team_id == team_id
                && channel.name == "town-square"
                && !channel.members.contains(&user_id)
            {
                channel.members.push(user_id.clone());
            }
        }

        HttpResponse::created(json!({ "team_id": team_id, "user_id": user_id }))
    }

    fn create_channel(&mut self, req: &HttpRequest) -> HttpResponse {
        let creator = match self.bearer_user(&req.headers) {
            Some(uid) => uid,
            None => return HttpResponse::api_error(401, "Unauthorized", "login required"),
        };

        let body = &req.body;
        let team_id = body["team_id"].as_str().unwrap_or_default().to_string();
        let name = body["name"].as_str().unwrap_or_default().to_string();
        let display_name = body["display_name"].as_str().unwrap_or_default().to_string();
        if !self.teams.contains_key(&team_id) {
            return HttpResponse::api_error(404, "Not Found", "team not found");
        }
        if name.is_empty() {
            return HttpResponse::api_error(400, "Bad Request", "channel name required");
        }

        let id = self.next_id("cid");
        let channel = ChannelRec {
            id: id.clone(),
            name,
            display_name,
            team_id,
            archived: false,
            members: vec![creator],
        };
        let response = HttpResponse::created(channel_json(&channel));
        self.channels.insert(id, channel);
        response
    }

    fn patch_config(&mut self, body: &Value) -> HttpResponse {
        if let Some(enabled) = body["TeamSettings"]["ExperimentalViewArchivedChannels"].as_bool() {
            self.flag_archived = enabled;
        }
        HttpResponse::ok(json!({}))
    }

    fn bearer_user(&self, headers: &HashMap<String, String>) -> Option<String> {
        let auth = headers.get("authorization")?;
        let token = auth.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    // --- WebDriver handlers ---

    fn new_session(&mut self) -> HttpResponse {
        let sid = self.next_id("sess");
        self.sessions.insert(sid.clone(), PageState::default());
        HttpResponse::wd_ok(json!({ "sessionId": sid, "capabilities": {} }))
    }

    fn navigate(&mut self, sid: &str, body: &Value) -> HttpResponse {
        let url = body["url"].as_str().unwrap_or_default().to_string();
        let (origin, path) = split_url(&url);

        let (team, channel) = {
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if parts.len() == 3 && parts[1] == "channels" {
                let team = self.teams.values().find(|t| t.name == parts[0]).cloned();
                let channel = team.as_ref().and_then(|t| {
                    self.channels
                        .values()
                        .find(|c| c.team_id == t.id && c.name == parts[2])
                        .cloned()
                });
                (team.map(|t| t.id), channel.map(|c| c.id))
            } else {
                (None, None)
            }
        };

        let page = match self.sessions.get_mut(sid) {
            Some(page) => page,
            None => return invalid_session(sid),
        };
        page.origin = origin;
        page.path = path;
        page.team = team;
        page.channel = channel;
        page.modal_open = false;
        page.dropdown_expanded = false;
        page.archived_mode = false;
        page.search.clear();
        page.menu_open = false;
        page.confirm_open = false;

        HttpResponse::wd_ok(Value::Null)
    }

    fn current_url(&self, sid: &str) -> HttpResponse {
        match self.sessions.get(sid) {
            Some(page) => HttpResponse::wd_ok(json!(format!("{}{}", page.origin, page.path))),
            None => invalid_session(sid),
        }
    }

    fn add_cookie(&mut self, sid: &str, body: &Value) -> HttpResponse {
        let name = body["cookie"]["name"].as_str().unwrap_or_default();
        let value = body["cookie"]["value"].as_str().unwrap_or_default();

        let user = if name == "AUTHTOKEN" {
            self.tokens.get(value).cloned()
        } else {
            None
        };

        let page = match self.sessions.get_mut(sid) {
            Some(page) => page,
            None => return invalid_session(sid),
        };
        if let Some(user) = user {
            page.user = Some(user);
        }
        HttpResponse::wd_ok(Value::Null)
    }

    fn find_element(&mut self, sid: &str, body: &Value) -> HttpResponse {
        let selector = body["value"].as_str().unwrap_or_default().to_string();
        match self.resolve(sid, &selector) {
            None => invalid_session(sid),
            Some(ids) => match ids.first() {
                Some(id) => HttpResponse::wd_ok(json!({ ELEMENT_KEY: id })),
                None => HttpResponse::no_such_element(&selector),
            },
        }
    }

    fn find_elements(&mut self, sid: &str, body: &Value) -> HttpResponse {
        let selector = body["value"].as_str().unwrap_or_default().to_string();
        match self.resolve(sid, &selector) {
            None => invalid_session(sid),
            Some(ids) => {
                let refs: Vec<Value> = ids.iter().map(|id| json!({ ELEMENT_KEY: id })).collect();
                HttpResponse::wd_ok(json!(refs))
            }
        }
    }

    /// Map a CSS selector to the virtual elements it currently matches.
    /// Returns None for an unknown session.
    fn resolve(&self, sid: &str, selector: &str) -> Option<Vec<String>> {
        let page = self.sessions.get(sid)?;
        let on_team_page = page.user.is_some() && page.team.is_some();
        let current_archived = page
            .channel
            .as_ref()
            .and_then(|id| self.channels.get(id))
            .map(|c| c.archived)
            .unwrap_or(false);

        let ids = match selector {
            "#publicChannelList" if on_team_page => vec!["publicChannelList".to_string()],
            "#sidebarChannelsMore" if on_team_page => vec!["moreTrigger".to_string()],
            "#moreChannelsModal" if page.modal_open => vec!["moreChannelsModal".to_string()],
            "#channelsMoreDropdown" if page.modal_open && self.flag_archived => {
                vec!["channelsDropdown".to_string()]
            }
            "#channelsMoreDropdownPublic"
                if page.modal_open && self.flag_archived && page.dropdown_expanded =>
            {
                vec!["optPublic".to_string()]
            }
            "#channelsMoreDropdownArchived"
                if page.modal_open && self.flag_archived && page.dropdown_expanded =>
            {
                vec!["optArchived".to_string()]
            }
            "#searchChannelsTextbox" if page.modal_open => vec!["searchBox".to_string()],
            "#moreChannelsList" if page.modal_open => vec!["channelList".to_string()],
            "#moreChannelsList .more-modal-row" if page.modal_open => self
                .listed_channels(page)
                .iter()
                .map(|c| format!("row:{}", c.id))
                .collect(),
            "#channelHeaderTitle" if page.channel.is_some() => vec!["headerTitle".to_string()],
            ".Menu__content" if page.menu_open => vec!["channelMenu".to_string()],
            "#channelArchiveChannel" if page.menu_open => vec!["menuArchive".to_string()],
            "#deleteChannelModal" if page.confirm_open => vec!["confirmModal".to_string()],
            "#deleteChannelModalDeleteButton" if page.confirm_open => {
                vec!["confirmButton".to_string()]
            }
            "#channelArchivedMessage" if current_archived => vec!["archivedBanner".to_string()],
            "#post_textbox" if page.channel.is_some() && !current_archived => {
                vec!["postTextbox".to_string()]
            }
            other => {
                if let Some(name) = other.strip_prefix("#sidebarItem_") {
                    self.sidebar_channels(page)
                        .iter()
                        .filter(|c| c.name == name)
                        .map(|c| format!("side:{}", c.name))
                        .collect()
                } else {
                    Vec::new()
                }
            }
        };
        Some(ids)
    }

    /// Channels the discovery modal currently lists
    fn listed_channels(&self, page: &PageState) -> Vec<&ChannelRec> {
        let team = match &page.team {
            Some(team) => team,
            None => return Vec::new(),
        };
        let user = page.user.as_deref().unwrap_or_default();
        let search = page.search.to_lowercase();

        let mut listed: Vec<&ChannelRec> = self
            .channels
            .values()
            .filter(|c| &c.team_id == team)
            .filter(|c| {
                if page.archived_mode {
                    c.archived
                } else {
                    !c.archived && !c.members.iter().any(|m| m == user)
                }
            })
            .filter(|c| search.is_empty() || c.display_name.to_lowercase().contains(&search))
            .collect();
        listed.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        listed
    }

    /// Channels shown in the public sidebar group (joined, unarchived)
    fn sidebar_channels(&self, page: &PageState) -> Vec<&ChannelRec> {
        let team = match &page.team {
            Some(team) => team,
            None => return Vec::new(),
        };
        let user = page.user.as_deref().unwrap_or_default();

        let mut channels: Vec<&ChannelRec> = self
            .channels
            .values()
            .filter(|c| &c.team_id == team && !c.archived)
            .filter(|c| c.members.iter().any(|m| m == user))
            .collect();
        channels.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        channels
    }

    fn click(&mut self, sid: &str, eid: &str) -> HttpResponse {
        if !self.sessions.contains_key(sid) {
            return invalid_session(sid);
        }

        if let Some(channel_id) = eid.strip_prefix("row:") {
            return self.click_row(sid, &channel_id.to_string());
        }
        if let Some(channel_name) = eid.strip_prefix("side:") {
            return self.click_sidebar(sid, &channel_name.to_string());
        }

        let confirm_target = self.sessions.get(sid).and_then(|p| p.channel.clone());
        let mut archive_target = None;

        let page = self.sessions.get_mut(sid).expect("session checked above");
        match eid {
            "moreTrigger" => {
                page.modal_open = true;
                page.archived_mode = false;
                page.dropdown_expanded = false;
                page.search.clear();
            }
            "channelsDropdown" => page.dropdown_expanded = !page.dropdown_expanded,
            "optPublic" => {
                page.archived_mode = false;
                page.dropdown_expanded = false;
            }
            "optArchived" => {
                page.archived_mode = true;
                page.dropdown_expanded = false;
            }
            "headerTitle" => page.menu_open = true,
            "menuArchive" => {
                page.menu_open = false;
                page.confirm_open = true;
            }
            "confirmButton" => {
                page.confirm_open = false;
                archive_target = confirm_target;
            }
            _ => {}
        }

        if let Some(channel_id) = archive_target {
            if let Some(channel) = self.channels.get_mut(&channel_id) {
                channel.archived = true;
            }
        }
        HttpResponse::wd_ok(Value::Null)
    }

    fn click_row(&mut self, sid: &str, channel_id: &str) -> HttpResponse {
        let (archived_mode, user) = match self.sessions.get(sid) {
            Some(page) => (page.archived_mode, page.user.clone()),
            None => return invalid_session(sid),
        };

        let (team_id, channel_name) = {
            let channel = match self.channels.get_mut(channel_id) {
                Some(channel) => channel,
                None => return HttpResponse::no_such_element("channel row"),
            };
            // Selecting a public row joins the channel; an archived row is
            // view-only
            if !archived_mode {
                if let Some(user) = &user {
                    if !channel.members.contains(user) {
                        channel.members.push(user.clone());
                    }
                }
            }
            (channel.team_id.clone(), channel.name.clone())
        };
        let team_name = self
            .teams
            .get(&team_id)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        let page = self.sessions.get_mut(sid).expect("session checked above");
        page.channel = Some(channel_id.to_string());
        page.path = format!("/{team_name}/channels/{channel_name}");
        page.modal_open = false;
        page.dropdown_expanded = false;
        page.search.clear();
        HttpResponse::wd_ok(Value::Null)
    }

    fn click_sidebar(&mut self, sid: &str, channel_name: &str) -> HttpResponse {
        let target = {
            let page = match self.sessions.get(sid) {
                Some(page) => page,
                None => return invalid_session(sid),
            };
            self.sidebar_channels(page)
                .iter()
                .find(|c| c.name == channel_name)
                .map(|c| (c.id.clone(), c.team_id.clone(), c.name.clone()))
        };

        let (channel_id, team_id, name) = match target {
            Some(t) => t,
            None => return HttpResponse::no_such_element(channel_name),
        };
        let team_name = self
            .teams
            .get(&team_id)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        let page = self.sessions.get_mut(sid).expect("session checked above");
        page.channel = Some(channel_id);
        page.path = format!("/{team_name}/channels/{name}");
        page.modal_open = false;
        page.menu_open = false;
        page.confirm_open = false;
        HttpResponse::wd_ok(Value::Null)
    }

    fn send_keys(&mut self, sid: &str, eid: &str, body: &Value) -> HttpResponse {
        let text = body["text"].as_str().unwrap_or_default();
        let page = match self.sessions.get_mut(sid) {
            Some(page) => page,
            None => return invalid_session(sid),
        };
        if eid == "searchBox" {
            page.search.push_str(text);
        }
        HttpResponse::wd_ok(Value::Null)
    }

    fn clear(&mut self, sid: &str, eid: &str) -> HttpResponse {
        let page = match self.sessions.get_mut(sid) {
            Some(page) => page,
            None => return invalid_session(sid),
        };
        if eid == "searchBox" {
            page.search.clear();
        }
        HttpResponse::wd_ok(Value::Null)
    }

    fn element_text(&self, sid: &str, eid: &str) -> HttpResponse {
        let page = match self.sessions.get(sid) {
            Some(page) => page,
            None => return invalid_session(sid),
        };

        let text = if let Some(channel_id) = eid.strip_prefix("row:") {
            self.channels
                .get(channel_id)
                .map(|c| c.display_name.clone())
                .unwrap_or_default()
        } else {
            match eid {
                "channelsDropdown" => {
                    if page.archived_mode {
                        "Show: Archived Channels".to_string()
                    } else {
                        "Show: Public Channels".to_string()
                    }
                }
                "optPublic" => "Public Channels".to_string(),
                "optArchived" => "Archived Channels".to_string(),
                "headerTitle" => page
                    .channel
                    .as_ref()
                    .and_then(|id| self.channels.get(id))
                    .map(|c| c.display_name.clone())
                    .unwrap_or_default(),
                "archivedBanner" => ARCHIVED_BANNER.to_string(),
                "publicChannelList" => {
                    let mut names: Vec<String> = self
                        .sidebar_channels(page)
                        .iter()
                        .map(|c| c.display_name.clone())
                        .collect();
                    names.push("More...".to_string());
                    names.join("\n")
                }
                _ => String::new(),
            }
        };

        HttpResponse::wd_ok(json!(text))
    }
}

fn invalid_session(sid: &str) -> HttpResponse {
    HttpResponse::wd_error(
        404,
        "Not Found",
        "invalid session id",
        &format!("unknown session '{sid}'"),
    )
}

fn split_url(url: &str) -> (String, String) {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[after_scheme..].find('/') {
        Some(slash) => {
            let split = after_scheme + slash;
            (url[..split].to_string(), url[split..].to_string())
        }
        None => (url.to_string(), "/".to_string()),
    }
}

fn user_json(user: &UserRec) -> Value {
    json!({ "id": user.id, "username": user.username, "email": user.email })
}

fn team_json(team: &TeamRec) -> Value {
    json!({ "id": team.id, "name": team.name, "display_name": team.display_name, "type": "O" })
}

fn channel_json(channel: &ChannelRec) -> Value {
    json!({
        "id": channel.id,
        "name": channel.name,
        "display_name": channel.display_name,
        "team_id": channel.team_id,
        "type": "O",
    })
}
