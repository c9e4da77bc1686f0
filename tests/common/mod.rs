//! Shared fixtures for langsniff integration tests
//!
//! - Representative snippets per bundled language
//! - `ProfileDir` for writing throwaway profile sources to disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const JAVA_HELLO: &str = r#"public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}"#;

pub const CSS_BUTTON: &str = r#".btn {
    color: #fff;
    background-color: #007bff;
    padding: 10px 20px;
    border-radius: 4px;
}

.btn:hover {
    background-color: #0056b3;
}"#;

pub const GO_MAIN: &str = r#"package main

import "fmt"

func main() {
    msg := "hello"
    fmt.Println(msg)
}"#;

pub const PYTHON_GREET: &str = r#"def greet(name):
    """Say hello."""
    print(f"Hello, {name}!")

if __name__ == "__main__":
    greet("world")"#;

pub const RUBY_CLASS: &str = r#"class User
  attr_reader :name

  def initialize(name)
    @name = name
  end

  def greet
    puts "Hello, #{@name}"
  end
end"#;

pub const HTML_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Test</title>
</head>
<body>
  <p>Hello</p>
</body>
</html>"#;

pub const XML_NOTE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<note>
  <to>Tove</to>
  <from>Jani</from>
</note>"#;

pub const SVG_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M12 2L2 7l10 5 10-5-10-5z" fill="none" stroke="currentColor"/>
</svg>"#;

pub const TWIG_PAGE: &str = r#"{% extends 'base.html.twig' %}

{% block body %}
  <h1>{{ title|upper }}</h1>
  {% for item in items %}
    <li>{{ item.name }}</li>
  {% endfor %}
{% endblock %}"#;

pub const TYPESCRIPT_GREET: &str = r#"interface User {
  id: number;
  name: string;
}

function greet(user: User): string {
  return `Hello ${user.name}`;
}"#;

pub const JAVASCRIPT_CLICK: &str = r#"const button = document.querySelector('#submit');
button.addEventListener('click', () => {
  console.log('clicked');
});"#;

pub const SCSS_NAV: &str = r#"$mainColor: #333;

.nav {
  color: $mainColor;
  &:hover {
    color: red;
  }
  @include rounded(4px);
}"#;

pub const PHP_CLASS: &str = r#"<?php

namespace App\Service;

final class Greeter
{
    public function __construct(private string $name) {}

    public function greet(): string
    {
        return "Hello, {$this->name}";
    }
}"#;

pub const PLAIN_PROSE: &str = "The quick brown fox jumps over the lazy dog.";

/// Temporary directory of profile files
pub struct ProfileDir {
    dir: TempDir,
}

impl ProfileDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` inside the directory
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("write profile file");
        path
    }
}

/// Bundled profile directory in the source tree
pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}
