// Asset configuration keys
pub const JSON_DEVICE_URL: &str = "url";
pub const JSON_USERNAME: &str = "username";

// Action parameter keys
pub const JSON_TICKET_ID: &str = "id";
pub const JSON_SUBJECT: &str = "subject";
pub const JSON_DESCRIPTION: &str = "description";
pub const JSON_FIELDS: &str = "fields";
pub const JSON_QUERY: &str = "query";
pub const JSON_PER_PAGE: &str = "max_results_per_page";
pub const JSON_PAGE: &str = "page_number";

// Summary keys
pub const JSON_NEW_TICKET_ID: &str = "created_ticket_id";
pub const JSON_GOT_TICKET_ID: &str = "queried_ticket_id";
pub const JSON_UPDATED_TICKET_ID: &str = "updated_ticket_id";
pub const JSON_TOTAL_TICKETS: &str = "total_tickets";
pub const JSON_RETURNED_TICKETS: &str = "returned_tickets";

// Action identifiers
pub const ACTION_ID_TEST_CONNECTIVITY: &str = "test_asset_connectivity";
pub const ACTION_ID_CREATE_TICKET: &str = "create_ticket";
pub const ACTION_ID_GET_TICKET: &str = "get_ticket";
pub const ACTION_ID_UPDATE_TICKET: &str = "update_ticket";
pub const ACTION_ID_LIST_TICKETS: &str = "list_tickets";
pub const ACTION_ID_RUN_QUERY: &str = "run_query";

pub const ACTION_IDS: [&str; 6] = [
    ACTION_ID_TEST_CONNECTIVITY,
    ACTION_ID_CREATE_TICKET,
    ACTION_ID_GET_TICKET,
    ACTION_ID_UPDATE_TICKET,
    ACTION_ID_LIST_TICKETS,
    ACTION_ID_RUN_QUERY,
];

// Messages
pub const ERR_CREDENTIALS_MISSING: &str = "Please specify one of either 'Password' or 'API Token'";
pub const ERR_CONNECTIVITY_TEST: &str = "Connectivity test failed";
pub const SUCC_CONNECTIVITY_TEST: &str = "Connectivity test passed";
pub const ERR_SERVER_CONNECTION: &str = "Connection failed";
pub const ERR_FIELDS_JSON_PARSE: &str = "Unable to parse the fields parameter into a dictionary";
pub const ERR_EMPTY_FIELDS: &str = "The fields dictionary was detected to be empty";
pub const ERR_INVALID_CUSTOM_FIELDS: &str = "Invalid value for custom_field";
pub const ERR_INVALID_CUSTOM_FIELD_ENTRY: &str = "Invalid value for field custom_field";
pub const ERR_NO_DATA: &str = "No data found";
pub const ERR_JSON_PARSE_GENERIC: &str = "Error while parsing the response";
pub const MSG_GET_INCIDENT_TEST: &str = "Querying a recent tickets to check credentials";

/// Longest JSON-parse failure message that is reported verbatim.
pub const MAX_PARSE_ERROR_LEN: usize = 500;

/// Responses with these codes succeed whatever the body holds.
pub const EMPTY_RESPONSE_STATUS_CODES: [u16; 2] = [201, 204];

pub const API_URI: &str = "/api/v2";
pub const DEFAULT_MAX_RESULTS: u64 = 100;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NAME_CACHE_CAPACITY: usize = 1024;

/// Ticket fields holding user ids that get a `<field>_name` companion.
pub const USER_ID_KEYS: [&str; 3] = ["submitter_id", "assignee_id", "requester_id"];

pub const SEARCH_QUERY_TYPE: &str = "ticket";
