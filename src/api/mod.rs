pub mod zendesk;
