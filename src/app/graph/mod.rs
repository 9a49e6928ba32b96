mod interaction;
mod search;
mod view;
