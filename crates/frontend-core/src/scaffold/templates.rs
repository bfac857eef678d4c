//! Fixed file templates
//!
//! Placeholders: `{{name}}` (normalized name), `{{title}}` (capitalized
//! name), `{{app_title}}` (application title, layouts only).

use crate::names;

pub const PAGE_VIEW: &str = r#"<div>
  <div class="container mx-auto px-4 py-16">
    <h1 class="text-4xl font-bold text-gray-900 mb-4">
      {{title}}
    </h1>
    <p class="text-gray-600">
      {{title}} page content will go here.
    </p>
  </div>
</div>
"#;

pub const PAGE_STYLESHEET: &str = r#"/* {{title}} page custom styles */
.{{name}}-container {
  /* Custom styles for {{name}} page can be added here */
}
"#;

pub const STIMULUS_CONTROLLER: &str = r#"import { Controller } from "@hotwired/stimulus"

// Stimulus controller for {{title}} page
export default class extends Controller {
  connect() {
    console.log("{{title}} controller connected")
  }

  disconnect() {
    console.log("{{title}} controller disconnected")
  }

  // Custom methods can be added here
}
"#;

pub const LAYOUT: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title><%= content_for(:title) || "{{title}}" %></title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1">
    <meta name="apple-mobile-web-app-capable" content="yes">
    <meta name="application-name" content="{{app_title}}">
    <meta name="mobile-web-app-capable" content="yes">
    <%= yield :head %>
    <%= stylesheet_link_tag :app, "data-turbo-track": "reload" %>
    <%= javascript_importmap_tags %>
  </head>

  <body>
    <main>
      <%= yield %>
    </main>
  </body>
</html>
"#;

pub const HOME_CONTROLLER: &str = r#"class HomeController < ApplicationController
  def index
  end
end
"#;

pub const HOME_INDEX_VIEW: &str = r#"<div>
  <div class="min-h-screen bg-gradient-to-br from-blue-50 to-indigo-100">
    <div class="container mx-auto px-4 py-16">
      <div class="text-center">
        <h1 class="text-5xl font-bold text-gray-900 mb-4">
          Welcome! 👋
        </h1>
        <p class="text-xl text-gray-600 mb-8">
          Created with Rails Frontend CLI
        </p>
        <div class="inline-block bg-white rounded-lg shadow-lg p-8">
          <p class="text-gray-700 mb-4">
            Your project has been successfully created and is ready to use!
          </p>
          <p class="text-sm text-gray-500">
            You can start developing with Tailwind CSS and Stimulus.
          </p>
        </div>
      </div>
    </div>
  </div>
</div>
"#;

pub const SHARED_HEADER: &str = r#"<header class="bg-white shadow-sm">
  <div class="container mx-auto px-4 py-4">
    <div class="flex items-center justify-between">
      <div class="text-2xl font-bold text-indigo-600">
        Logo
      </div>
      <%= render 'shared/navbar' %>
    </div>
  </div>
</header>
"#;

pub const SHARED_NAVBAR: &str = r#"<nav class="hidden md:flex space-x-6">
  <%= link_to "Home", root_path, class: "text-gray-700 hover:text-indigo-600 transition" %>
  <!-- Other menu items will be added here -->
</nav>
"#;

pub const SHARED_FOOTER: &str = r#"<footer class="bg-gray-800 text-white py-6 text-center">
  <p class="text-gray-400">
    © <%= Time.current.year %> All rights reserved.
  </p>
</footer>
"#;

/// Stylesheet for a shared element (`header`, `nav`, `footer`) or the home page
pub const SECTION_STYLESHEET: &str = r#"/* {{title}} custom styles */
{{name}} {
  /* Custom styles for {{name}} can be added here */
}
"#;

pub const PROCFILE_DEV: &str = "web: bin/rails server -b 0.0.0.0\ncss: bin/rails tailwindcss:watch\n";

/// Substitute `{{name}}` and `{{title}}`
pub fn render(template: &str, name: &str) -> String {
    template
        .replace("{{title}}", &names::capitalize(name))
        .replace("{{name}}", name)
}

pub fn page_view(name: &str) -> String {
    render(PAGE_VIEW, name)
}

pub fn page_stylesheet(name: &str) -> String {
    render(PAGE_STYLESHEET, name)
}

pub fn stimulus_controller(name: &str) -> String {
    render(STIMULUS_CONTROLLER, name)
}

pub fn layout(name: &str, app_title: &str) -> String {
    render(LAYOUT, name).replace("{{app_title}}", app_title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_view_uses_capitalized_name() {
        let view = page_view("urunler");
        assert!(view.contains("      Urunler\n"));
        assert!(view.contains("Urunler page content will go here."));
        assert!(!view.contains("{{"));
    }

    #[test]
    fn test_page_stylesheet() {
        let css = page_stylesheet("about");
        assert!(css.starts_with("/* About page custom styles */\n.about-container {"));
    }

    #[test]
    fn test_stimulus_controller() {
        let js = stimulus_controller("dropdown");
        assert!(js.starts_with("import { Controller } from \"@hotwired/stimulus\""));
        assert!(js.contains("console.log(\"Dropdown controller connected\")"));
    }

    #[test]
    fn test_layout_carries_application_title() {
        let html = layout("landing", "My Shop");
        assert!(html.contains("|| \"Landing\" %></title>"));
        assert!(html.contains("<meta name=\"application-name\" content=\"My Shop\">"));
        assert!(!html.contains("{{"));
    }
}
